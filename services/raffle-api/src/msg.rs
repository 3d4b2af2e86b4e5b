use cosmwasm_schema::cw_serde;
use rooch_client::BalanceInfo;
use rooch_raffle_common::form::{CreateCoinEnvelopeForm, CreateNftEnvelopeForm, CreateRaffleForm};
use rooch_raffle_common::types::{Envelope, Raffle};
use serde::Deserialize;

use crate::state::envelope_attributes;

/// Which on-chain object an attributes record decorates.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum ActivityKind {
    Coin,
    Nft,
    Raffle,
}

impl ActivityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityKind::Coin => "coin",
            ActivityKind::Nft => "nft",
            ActivityKind::Raffle => "raffle",
        }
    }
}

#[cw_serde]
pub struct CreateAttributesMsg {
    pub envelope_id: String,
    pub envelope_type: ActivityKind,
    pub cover_image: Option<String>,
    pub cover_color: Option<String>,
    pub text_color: Option<String>,
    pub greeting: Option<String>,
}

/// Partial update: absent fields are left alone, an empty string clears.
#[cw_serde]
pub struct UpdateAttributesMsg {
    pub envelope_id: String,
    pub cover_image: Option<String>,
    pub cover_color: Option<String>,
    pub text_color: Option<String>,
    pub greeting: Option<String>,
}

#[cw_serde]
pub struct SubmitTransactionMsg {
    /// BCS bytes of a signed transaction, hex encoded
    pub tx_hex: String,
}

/// A transaction for the wallet to sign.
#[cw_serde]
pub enum MoveCallRequest {
    CreateCoinEnvelope(CreateCoinEnvelopeForm),
    CreateNftEnvelope(CreateNftEnvelopeForm),
    CreateRaffle(CreateRaffleForm),
    ClaimCoinEnvelope { envelope_id: String, coin_type: String },
    ClaimNftEnvelope { envelope_id: String, nft_type: String },
    ClaimBox { box_id: String, coin_type: String },
    OpenBox { box_id: String, coin_type: String },
}

pub enum ExecuteMsg {
    CreateAttributes(CreateAttributesMsg),
    UpdateAttributes(UpdateAttributesMsg),
    UploadImage { bytes: Vec<u8> },
    BuildMoveCall(MoveCallRequest),
    SubmitTransaction(SubmitTransactionMsg),
}

pub enum QueryMsg {
    Attributes {
        envelope_id: String,
    },
    Envelope {
        id: String,
    },
    Raffle {
        id: String,
    },
    Claimed {
        id: String,
        cursor: Option<String>,
        limit: Option<u32>,
    },
    Balance {
        owner: String,
        coin_type: String,
    },
    Image {
        filename: String,
    },
}

// ─── HTTP query strings ───

#[derive(Deserialize, Debug)]
pub struct AttributesParams {
    pub envelope_id: String,
}

#[derive(Deserialize, Debug)]
pub struct PageParams {
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Deserialize, Debug)]
pub struct BalanceParams {
    pub owner: String,
    pub coin_type: String,
}

// ─── Responses ───

#[cw_serde]
pub struct AttributesResponse {
    pub envelope_id: String,
    pub envelope_type: String,
    pub cover_image: Option<String>,
    pub cover_color: Option<String>,
    pub text_color: Option<String>,
    pub greeting: Option<String>,
    /// Milliseconds since the unix epoch
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<envelope_attributes::Model> for AttributesResponse {
    fn from(model: envelope_attributes::Model) -> Self {
        AttributesResponse {
            envelope_id: model.envelope_id,
            envelope_type: model.envelope_type,
            cover_image: model.cover_image,
            cover_color: model.cover_color,
            text_color: model.text_color,
            greeting: model.greeting,
            created_at: model.created_at.timestamp_millis(),
            updated_at: model.updated_at.timestamp_millis(),
        }
    }
}

#[cw_serde]
pub struct EnvelopeResponse {
    pub envelope: Envelope,
    pub attributes: Option<AttributesResponse>,
}

#[cw_serde]
pub struct RaffleResponse {
    pub raffle: Raffle,
    pub attributes: Option<AttributesResponse>,
}

#[cw_serde]
pub struct BalanceResponse {
    pub info: BalanceInfo,
    /// `balance` scaled by `decimals`
    pub formatted: String,
}

#[cw_serde]
pub struct UploadResponse {
    pub url: String,
}
