use serde_json::Value;

use crate::coin::{coin_type_from_store, generic_argument, normalize_coin_type};
use crate::object::{
    as_address_list, as_string, as_timestamp_ms, as_u256, as_u64, decoded_struct, field,
    object_id, table_handle, type_tag,
};
use crate::status::{derive_coin_status, derive_status};
use crate::types::{CoinEnvelope, Envelope, EnvelopeKind, EnvelopeTheme, NftEnvelope};

/// Project an envelope object state into an [`Envelope`].
///
/// An envelope holding a `coin_store` is a coin envelope, anything else is an
/// NFT envelope. Only a missing object id rejects the state; every other
/// field falls back to `None` or empty.
pub fn format_envelope_data(state: &Value, now: u64) -> Option<Envelope> {
    let id = object_id(state)?;
    let data = decoded_struct(state);

    let text = |name: &str| field(data, name).and_then(as_string);
    let start_time = field(data, "start_time").and_then(as_timestamp_ms);
    let end_time = field(data, "end_time").and_then(as_timestamp_ms);

    let (kind, status) = match field(data, "coin_store") {
        Some(store) => {
            let coin = coin_envelope(data, store);
            let status = derive_coin_status(now, start_time, end_time, coin.remaining_coin);
            (EnvelopeKind::Coin(coin), status)
        }
        None => {
            let nft = nft_envelope(state, data);
            (EnvelopeKind::Nft(nft), derive_status(now, start_time, end_time))
        }
    };

    Some(Envelope {
        id,
        sender: text("sender"),
        name: text("name"),
        desc: text("desc"),
        image_url: text("image_url"),
        theme: EnvelopeTheme {
            cover_color: text("cover_color"),
            text_color: text("text_color"),
        },
        start_time,
        end_time,
        total_envelope: field(data, "total_envelope").and_then(as_u64),
        claimed_envelope: field(data, "claimed_envelope").and_then(as_u64),
        status,
        kind,
    })
}

fn coin_envelope(data: &Value, store: &Value) -> CoinEnvelope {
    let coin_type = store
        .get("type")
        .and_then(Value::as_str)
        .and_then(coin_type_from_store)
        .or_else(|| {
            field(data, "coin_type")
                .and_then(as_string)
                .map(|t| normalize_coin_type(&t))
        });

    CoinEnvelope {
        coin_type,
        total_coin: field(data, "total_coin").and_then(as_u256),
        remaining_coin: field(data, "remaining_coin").and_then(as_u256),
        claim_table: field(data, "claimed_address").and_then(table_handle),
    }
}

fn nft_envelope(state: &Value, data: &Value) -> NftEnvelope {
    let nft_type = field(data, "nft_type")
        .and_then(as_string)
        .or_else(|| type_tag(state).and_then(|tag| generic_argument(&tag).map(str::to_string)))
        .map(|t| normalize_coin_type(&t));

    NftEnvelope {
        nft_type,
        claimed_address: field(data, "claimed_address")
            .map(as_address_list)
            .unwrap_or_default(),
        nft_table: field(data, "nfts").and_then(table_handle),
    }
}
