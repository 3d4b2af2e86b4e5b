use std::sync::atomic::{AtomicU64, Ordering};

use rooch_raffle_common::coin::normalize_coin_type;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::ClientError;
use crate::msg::{
    BalanceInfo, ExecutionSummary, Page, RpcRequest, RpcResponse, METHOD_EXECUTE_RAW_TRANSACTION,
    METHOD_GET_BALANCE, METHOD_LIST_FIELD_STATES, METHOD_QUERY_OBJECT_STATES,
};

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Clamp a caller supplied page size the same way for every list call.
pub fn page_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT)
}

#[derive(Debug)]
pub struct RoochClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RoochClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_http(url, reqwest::Client::new())
    }

    pub fn with_http(url: impl Into<String>, http: reqwest::Client) -> Self {
        RoochClient {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one JSON-RPC call and decode its `result`.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        tracing::debug!(method, id, "rpc request");

        let response = self.http.post(&self.url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(method, id, status = status.as_u16(), "rpc http failure");
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        let body: RpcResponse = response.json().await?;
        if let Some(err) = body.error {
            tracing::warn!(method, id, code = err.code, "rpc error: {}", err.message);
            return Err(ClientError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        let result = body.result.ok_or_else(|| ClientError::MissingResult {
            method: method.to_string(),
        })?;
        serde_json::from_value(result).map_err(|source| ClientError::Decode {
            method: method.to_string(),
            source,
        })
    }

    /// Decoded states of the given objects, in whatever order the node
    /// returns them.
    pub async fn query_object_states(
        &self,
        object_ids: &[&str],
        decode: bool,
    ) -> Result<Vec<Value>, ClientError> {
        if object_ids.is_empty() {
            return Ok(vec![]);
        }
        let params = json!([
            { "object_id": object_ids.join(",") },
            null,
            object_ids.len().to_string(),
            { "decode": decode, "showDisplay": false, "descending": true }
        ]);
        let page: Page<Value> = self.call(METHOD_QUERY_OBJECT_STATES, params).await?;
        Ok(page.data)
    }

    pub async fn get_object(&self, object_id: &str) -> Result<Option<Value>, ClientError> {
        let states = self.query_object_states(&[object_id], true).await?;
        Ok(states.into_iter().next())
    }

    /// One page of the dynamic fields stored under a table handle.
    pub async fn list_field_states(
        &self,
        handle: &str,
        cursor: Option<Value>,
        limit: Option<u32>,
    ) -> Result<Page<Value>, ClientError> {
        let params = json!([
            handle,
            cursor.unwrap_or(Value::Null),
            page_limit(limit).to_string(),
            { "decode": true }
        ]);
        self.call(METHOD_LIST_FIELD_STATES, params).await
    }

    pub async fn get_balance(
        &self,
        owner: &str,
        coin_type: &str,
    ) -> Result<BalanceInfo, ClientError> {
        let params = json!([owner, normalize_coin_type(coin_type)]);
        self.call(METHOD_GET_BALANCE, params).await
    }

    /// Submit a wallet-signed transaction, hex encoded.
    pub async fn execute_raw_transaction(
        &self,
        tx_hex: &str,
    ) -> Result<ExecutionSummary, ClientError> {
        let view: Value = self
            .call(METHOD_EXECUTE_RAW_TRANSACTION, json!([tx_hex]))
            .await?;
        let summary = ExecutionSummary::from_view(&view);
        tracing::info!(tx_hash = ?summary.tx_hash, status = ?summary.status, "transaction submitted");
        Ok(summary)
    }
}
