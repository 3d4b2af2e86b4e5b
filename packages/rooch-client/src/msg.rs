use cosmwasm_std::Uint256;
use rooch_raffle_common::object::{as_string, get_path};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const METHOD_QUERY_OBJECT_STATES: &str = "rooch_queryObjectStates";
pub const METHOD_LIST_FIELD_STATES: &str = "rooch_listFieldStates";
pub const METHOD_GET_BALANCE: &str = "rooch_getBalance";
pub const METHOD_EXECUTE_RAW_TRANSACTION: &str = "rooch_executeRawTransaction";

#[derive(Serialize, Debug)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

#[derive(Deserialize, Debug)]
pub struct RpcResponse {
    pub result: Option<Value>,
    pub error: Option<RpcErrorObject>,
}

#[derive(Deserialize, Debug)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// Cursor-paginated result shared by the node's list methods.
#[derive(Deserialize, Debug, Clone)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<Value>,
    #[serde(default)]
    pub has_next_page: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct BalanceInfo {
    pub coin_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    pub decimals: u8,
    #[serde(default)]
    pub supply: Option<Uint256>,
    pub balance: Uint256,
}

/// What the caller needs out of a transaction execution view.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct ExecutionSummary {
    pub tx_hash: Option<String>,
    pub status: Option<String>,
}

impl ExecutionSummary {
    pub fn from_view(view: &Value) -> Self {
        ExecutionSummary {
            tx_hash: get_path(view, "execution_info.tx_hash").and_then(as_string),
            status: get_path(view, "execution_info.status.type").and_then(as_string),
        }
    }

    pub fn is_executed(&self) -> bool {
        self.status.as_deref() == Some("executed")
    }
}

/// Render an opaque node cursor as the string handed back to callers.
pub fn cursor_string(cursor: &Value) -> Option<String> {
    match cursor {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Inverse of [`cursor_string`]: JSON cursors round-trip as JSON, anything
/// else is passed through as a string.
pub fn cursor_value(cursor: &str) -> Value {
    match serde_json::from_str::<Value>(cursor) {
        Ok(v @ Value::Object(_)) => v,
        _ => Value::String(cursor.to_string()),
    }
}
