use std::collections::HashSet;

use serde_json::Value;

use crate::coin::{coin_type_from_store, normalize_coin_type};
use crate::object::{
    as_address_list, as_bool, as_string, as_timestamp_ms, as_u256, decoded_struct, field,
    object_id,
};
use crate::status::derive_status;
use crate::types::Raffle;

/// Project a raffle box object state into a [`Raffle`].
///
/// Once a box is drawn the contract moves winners out of `claimed_address`
/// into `reward_address`, so the entrant list reported here is the union of
/// both, without duplicates.
pub fn format_raffle_data(state: &Value, now: u64) -> Option<Raffle> {
    let id = object_id(state)?;
    let data = decoded_struct(state);

    let text = |name: &str| field(data, name).and_then(as_string);
    let addresses = |name: &str| field(data, name).map(as_address_list).unwrap_or_default();

    let start_time = field(data, "start_time").and_then(as_timestamp_ms);
    let end_time = field(data, "end_time").and_then(as_timestamp_ms);
    let reward_address = addresses("reward_address");
    let is_end = field(data, "is_end").and_then(as_bool).unwrap_or(false);

    let coin_type = field(data, "coin_store")
        .and_then(|store| store.get("type"))
        .and_then(Value::as_str)
        .and_then(coin_type_from_store)
        .or_else(|| text("coin_type").map(|t| normalize_coin_type(&t)));

    Some(Raffle {
        id,
        creator: text("creator").or_else(|| text("sender")),
        name: text("name"),
        desc: text("desc"),
        image_url: text("image_url"),
        coin_type,
        total_coin: field(data, "total_coin").and_then(as_u256),
        reward_coin: field(data, "reward_coin").and_then(as_u256),
        start_time,
        end_time,
        opened: is_end || !reward_address.is_empty(),
        claimed_address: union_addresses(addresses("claimed_address"), &reward_address),
        reward_address,
        status: derive_status(now, start_time, end_time),
    })
}

/// `claimed` followed by any `reward` entries not already present, with
/// duplicates from either list removed.
fn union_addresses(claimed: Vec<String>, reward: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    claimed
        .into_iter()
        .chain(reward.iter().cloned())
        .filter(|address| seen.insert(address.clone()))
        .collect()
}
