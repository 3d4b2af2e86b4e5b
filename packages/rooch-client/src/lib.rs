//! Thin JSON-RPC client for a Rooch node, plus the envelope and raffle
//! lookups built on it.

pub mod client;
pub mod error;
pub mod msg;
pub mod query;

pub use client::RoochClient;
pub use error::ClientError;
pub use msg::{BalanceInfo, ExecutionSummary, Page};
