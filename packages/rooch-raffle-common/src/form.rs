//! Create/claim forms and the Move calls they turn into.
//!
//! The wallet signs and submits the resulting [`MoveCall`]; nothing here
//! touches the network.

use std::collections::HashSet;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint256;

use crate::coin::normalize_coin_type;
use crate::error::FormError;

pub const MAX_NAME_LEN: usize = 64;
pub const MAX_DESC_LEN: usize = 512;

const ENVELOPE_MODULE: &str = "red_envelope";
const RAFFLE_MODULE: &str = "raffle";

#[cw_serde]
pub enum MoveArg {
    String(String),
    U64(u64),
    U256(Uint256),
    ObjectId(String),
    ObjectIds(Vec<String>),
}

#[cw_serde]
pub struct MoveCall {
    /// `<package>::<module>::<function>`
    pub function: String,
    pub type_args: Vec<String>,
    pub args: Vec<MoveArg>,
}

impl MoveCall {
    fn new(package: &str, module: &str, function: &str) -> Self {
        MoveCall {
            function: format!("{}::{}::{}", package, module, function),
            type_args: vec![],
            args: vec![],
        }
    }

    fn type_arg(mut self, ty: &str) -> Self {
        self.type_args.push(normalize_coin_type(ty));
        self
    }

    fn arg(mut self, arg: MoveArg) -> Self {
        self.args.push(arg);
        self
    }
}

/// Fields shared by every create form.
#[cw_serde]
pub struct ActivityDetails {
    pub name: String,
    pub desc: String,
    pub image_url: String,
    /// Milliseconds since the unix epoch
    pub start_time: u64,
    /// Milliseconds since the unix epoch
    pub end_time: u64,
}

impl ActivityDetails {
    pub fn validate(&self, now: u64) -> Result<(), FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(FormError::NameTooLong { max: MAX_NAME_LEN });
        }
        if self.desc.chars().count() > MAX_DESC_LEN {
            return Err(FormError::DescriptionTooLong { max: MAX_DESC_LEN });
        }
        if self.start_time >= self.end_time {
            return Err(FormError::InvalidTimeWindow {
                start: self.start_time,
                end: self.end_time,
            });
        }
        if self.end_time <= now {
            return Err(FormError::AlreadyEnded {
                end: self.end_time,
                now,
            });
        }
        Ok(())
    }

    fn leading_args(&self) -> Vec<MoveArg> {
        vec![
            MoveArg::String(self.name.trim().to_string()),
            MoveArg::String(self.desc.clone()),
            MoveArg::String(self.image_url.clone()),
        ]
    }

    fn window_args(&self) -> [MoveArg; 2] {
        [MoveArg::U64(self.start_time), MoveArg::U64(self.end_time)]
    }
}

fn require_positive(field: &str, value: Uint256) -> Result<(), FormError> {
    if value.is_zero() {
        return Err(FormError::Zero {
            field: field.to_string(),
        });
    }
    Ok(())
}

#[cw_serde]
pub struct CreateCoinEnvelopeForm {
    pub details: ActivityDetails,
    pub coin_type: String,
    pub total_envelope: u64,
    /// In the coin's smallest unit
    pub total_coin: Uint256,
}

impl CreateCoinEnvelopeForm {
    pub fn validate(&self, now: u64) -> Result<(), FormError> {
        self.details.validate(now)?;
        if self.coin_type.trim().is_empty() {
            return Err(FormError::MissingCoinType);
        }
        require_positive("total_envelope", Uint256::from(self.total_envelope))?;
        require_positive("total_coin", self.total_coin)?;
        if self.total_coin < Uint256::from(self.total_envelope) {
            return Err(FormError::AmountBelowCount {
                amount: self.total_coin.to_string(),
                count: self.total_envelope,
            });
        }
        Ok(())
    }

    pub fn to_move_call(&self, package: &str, now: u64) -> Result<MoveCall, FormError> {
        self.validate(now)?;
        let mut call = MoveCall::new(package, ENVELOPE_MODULE, "create_coin_envelope")
            .type_arg(&self.coin_type);
        call.args = self.details.leading_args();
        call.args.push(MoveArg::U64(self.total_envelope));
        call.args.push(MoveArg::U256(self.total_coin));
        call.args.extend(self.details.window_args());
        Ok(call)
    }
}

#[cw_serde]
pub struct CreateNftEnvelopeForm {
    pub details: ActivityDetails,
    pub nft_type: String,
    pub nft_ids: Vec<String>,
}

impl CreateNftEnvelopeForm {
    pub fn validate(&self, now: u64) -> Result<(), FormError> {
        self.details.validate(now)?;
        if self.nft_type.trim().is_empty() {
            return Err(FormError::MissingNftType);
        }
        if self.nft_ids.is_empty() {
            return Err(FormError::NoNfts);
        }
        let mut seen = HashSet::new();
        for id in &self.nft_ids {
            if !seen.insert(id) {
                return Err(FormError::DuplicateNft { id: id.clone() });
            }
        }
        Ok(())
    }

    pub fn to_move_call(&self, package: &str, now: u64) -> Result<MoveCall, FormError> {
        self.validate(now)?;
        let mut call = MoveCall::new(package, ENVELOPE_MODULE, "create_nft_envelope")
            .type_arg(&self.nft_type);
        call.args = self.details.leading_args();
        call.args.push(MoveArg::ObjectIds(self.nft_ids.clone()));
        call.args.extend(self.details.window_args());
        Ok(call)
    }
}

#[cw_serde]
pub struct CreateRaffleForm {
    pub details: ActivityDetails,
    pub coin_type: String,
    /// Reward pool, in the coin's smallest unit
    pub total_coin: Uint256,
    /// Paid to each winner
    pub reward_coin: Uint256,
}

impl CreateRaffleForm {
    pub fn validate(&self, now: u64) -> Result<(), FormError> {
        self.details.validate(now)?;
        if self.coin_type.trim().is_empty() {
            return Err(FormError::MissingCoinType);
        }
        require_positive("total_coin", self.total_coin)?;
        require_positive("reward_coin", self.reward_coin)?;
        if self.reward_coin > self.total_coin {
            return Err(FormError::RewardExceedsPool {
                reward: self.reward_coin.to_string(),
                pool: self.total_coin.to_string(),
            });
        }
        let remainder = self
            .total_coin
            .checked_rem(self.reward_coin)
            .map_err(|_| FormError::Zero {
                field: "reward_coin".to_string(),
            })?;
        if !remainder.is_zero() {
            return Err(FormError::UnevenRewardSplit {
                reward: self.reward_coin.to_string(),
                pool: self.total_coin.to_string(),
            });
        }
        Ok(())
    }

    /// Number of winners the pool pays for.
    pub fn winners(&self) -> Option<Uint256> {
        self.total_coin.checked_div(self.reward_coin).ok()
    }

    pub fn to_move_call(&self, package: &str, now: u64) -> Result<MoveCall, FormError> {
        self.validate(now)?;
        let mut call =
            MoveCall::new(package, RAFFLE_MODULE, "create_box").type_arg(&self.coin_type);
        call.args = self.details.leading_args();
        call.args.push(MoveArg::U256(self.total_coin));
        call.args.push(MoveArg::U256(self.reward_coin));
        call.args.extend(self.details.window_args());
        Ok(call)
    }
}

pub fn claim_coin_envelope(package: &str, envelope_id: &str, coin_type: &str) -> MoveCall {
    MoveCall::new(package, ENVELOPE_MODULE, "claim_coin_envelope")
        .type_arg(coin_type)
        .arg(MoveArg::ObjectId(envelope_id.to_string()))
}

pub fn claim_nft_envelope(package: &str, envelope_id: &str, nft_type: &str) -> MoveCall {
    MoveCall::new(package, ENVELOPE_MODULE, "claim_nft_envelope")
        .type_arg(nft_type)
        .arg(MoveArg::ObjectId(envelope_id.to_string()))
}

pub fn claim_box(package: &str, box_id: &str, coin_type: &str) -> MoveCall {
    MoveCall::new(package, RAFFLE_MODULE, "claim_box")
        .type_arg(coin_type)
        .arg(MoveArg::ObjectId(box_id.to_string()))
}

pub fn open_box(package: &str, box_id: &str, coin_type: &str) -> MoveCall {
    MoveCall::new(package, RAFFLE_MODULE, "open_box")
        .type_arg(coin_type)
        .arg(MoveArg::ObjectId(box_id.to_string()))
}
