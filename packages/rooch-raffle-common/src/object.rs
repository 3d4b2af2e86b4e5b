//! Lenient accessors over decoded object states.
//!
//! A node returns Move structs as `{ "abilities": n, "type": "...", "value": { .. } }`,
//! nested to whatever depth the struct layout has. Nothing in here fails on an
//! unexpected shape; a missing or mistyped field is simply `None`.

use std::str::FromStr;

use chrono::DateTime;
use cosmwasm_std::Uint256;
use serde_json::{Map, Value};

/// Integer timestamps below this are read as seconds rather than milliseconds.
const SECONDS_CUTOFF: u64 = 100_000_000_000;

/// The field map of a decoded struct, unwrapping one `{type, value}` layer.
pub fn struct_fields(value: &Value) -> Option<&Map<String, Value>> {
    let map = value.as_object()?;
    if map.contains_key("type") {
        if let Some(inner) = map.get("value").and_then(Value::as_object) {
            return Some(inner);
        }
    }
    Some(map)
}

/// Look up a named field of a decoded struct, descending through `value`
/// wrappers that carry no type tag.
pub fn field<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    let fields = struct_fields(value)?;
    fields.get(name).or_else(|| {
        fields
            .get("value")
            .filter(|inner| inner.is_object())
            .and_then(|inner| field(inner, name))
    })
}

/// Walk a dotted path such as `coin_store.value.id`. Numeric segments index
/// into arrays.
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(root, |current, segment| match current {
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => field(current, segment),
        })
}

/// The decoded struct carried by an object state, or the value itself when it
/// is already decoded.
pub fn decoded_struct(state: &Value) -> &Value {
    state.get("decoded_value").unwrap_or(state)
}

/// The object id of a state view.
pub fn object_id(state: &Value) -> Option<String> {
    state
        .get("id")
        .or_else(|| get_path(state, "metadata.id"))
        .and_then(as_string)
}

/// The full Move type tag of a state view.
pub fn type_tag(state: &Value) -> Option<String> {
    decoded_struct(state)
        .get("type")
        .or_else(|| state.get("object_type"))
        .or_else(|| get_path(state, "metadata.object_type"))
        .and_then(as_string)
}

pub fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn as_u256(value: &Value) -> Option<Uint256> {
    match value {
        Value::Number(n) => n.as_u64().map(Uint256::from),
        Value::String(s) => Uint256::from_str(s.trim()).ok(),
        _ => None,
    }
}

pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Milliseconds since the unix epoch from an integer (seconds or
/// milliseconds) or an RFC 3339 string.
pub fn as_timestamp_ms(value: &Value) -> Option<u64> {
    if let Some(raw) = as_u64(value) {
        return Some(if raw < SECONDS_CUTOFF {
            raw.saturating_mul(1000)
        } else {
            raw
        });
    }
    let text = value.as_str()?;
    let parsed = DateTime::parse_from_rfc3339(text.trim()).ok()?;
    u64::try_from(parsed.timestamp_millis()).ok()
}

/// Addresses from a JSON array or a decoded `vector` wrapper. Non-string
/// entries are dropped.
pub fn as_address_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Value::Object(map) => map.get("value").map(as_address_list).unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// The handle of a decoded `Table` (`handle.id`) or `Object` (`id`).
pub fn table_handle(value: &Value) -> Option<String> {
    get_path(value, "handle.id")
        .or_else(|| field(value, "id"))
        .and_then(as_string)
}
