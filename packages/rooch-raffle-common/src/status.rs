use cosmwasm_std::Uint256;

use crate::types::ActivityStatus;

/// Status of an activity at `now` (all values in milliseconds).
///
/// `now > end` is ended, `now >= start` is ongoing, anything earlier has not
/// started. An activity with no recorded start is treated as started at the
/// epoch, and one with no recorded end never ends.
pub fn derive_status(now: u64, start_time: Option<u64>, end_time: Option<u64>) -> ActivityStatus {
    let start = start_time.unwrap_or(0);
    let end = end_time.unwrap_or(u64::MAX);
    if now > end {
        ActivityStatus::Ended
    } else if now >= start {
        ActivityStatus::Ongoing
    } else {
        ActivityStatus::NotStarted
    }
}

/// Like [`derive_status`], but an ended coin envelope with nothing left in
/// it reports `AllClaimed`.
pub fn derive_coin_status(
    now: u64,
    start_time: Option<u64>,
    end_time: Option<u64>,
    remaining: Option<Uint256>,
) -> ActivityStatus {
    match derive_status(now, start_time, end_time) {
        ActivityStatus::Ended if remaining.is_some_and(|r| r.is_zero()) => {
            ActivityStatus::AllClaimed
        }
        status => status,
    }
}
