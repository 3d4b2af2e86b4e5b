use serde_json::Value;

use crate::object::{as_string, as_timestamp_ms, as_u256, decoded_struct, field, get_path};
use crate::types::ClaimedItem;

/// One row of an envelope's claim table.
///
/// Rows are dynamic fields `{ name: address, value: .. }`. The value is
/// either the claimed amount itself or a struct with `amount` and
/// `claimed_at`; with no timestamp in the value the row's creation time is
/// used instead. Accepts either the bare state or a `{ field_key, state }`
/// list entry.
pub fn format_claimed_item(entry: &Value) -> Option<ClaimedItem> {
    let state = entry.get("state").unwrap_or(entry);
    let data = decoded_struct(state);

    let address = field(data, "name").and_then(as_string)?;
    let value = field(data, "value")?;

    let amount = field(value, "amount")
        .and_then(as_u256)
        .or_else(|| as_u256(value))?;
    let claimed_at = field(value, "claimed_at")
        .or_else(|| field(value, "timestamp"))
        .and_then(as_timestamp_ms)
        .or_else(|| {
            state
                .get("created_at")
                .or_else(|| get_path(state, "metadata.created_at"))
                .and_then(as_timestamp_ms)
        });

    Some(ClaimedItem {
        address,
        amount,
        claimed_at,
    })
}
