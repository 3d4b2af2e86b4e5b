use std::collections::HashSet;

use cosmwasm_std::Uint256;
use rooch_raffle_common::types::{ClaimedItem, ClaimedPage, Envelope, EnvelopeKind, Raffle};
use rooch_raffle_common::{format_claimed_item, format_envelope_data, format_raffle_data};

use crate::client::{page_limit, RoochClient};
use crate::error::ClientError;
use crate::msg::{cursor_string, cursor_value};

impl RoochClient {
    /// The envelope at `id` as seen at `now` (milliseconds).
    pub async fn get_envelope(&self, id: &str, now: u64) -> Result<Option<Envelope>, ClientError> {
        let state = self.get_object(id).await?;
        Ok(state.and_then(|s| format_envelope_data(&s, now)))
    }

    pub async fn get_raffle(&self, id: &str, now: u64) -> Result<Option<Raffle>, ClientError> {
        let state = self.get_object(id).await?;
        Ok(state.and_then(|s| format_raffle_data(&s, now)))
    }

    /// One page of a claim table. Rows that cannot be read are skipped.
    pub async fn claimed_page(
        &self,
        handle: &str,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<ClaimedPage, ClientError> {
        let page = self
            .list_field_states(handle, cursor.map(cursor_value), limit)
            .await?;
        let items: Vec<ClaimedItem> = page.data.iter().filter_map(format_claimed_item).collect();
        if items.len() < page.data.len() {
            tracing::debug!(
                handle,
                skipped = page.data.len() - items.len(),
                "unreadable claim rows"
            );
        }
        Ok(ClaimedPage {
            items,
            next_cursor: page.next_cursor.as_ref().and_then(cursor_string),
            has_next_page: page.has_next_page,
        })
    }

    /// Every row of a claim table, walking pages until the node reports the
    /// end. A cursor seen twice also ends the walk.
    pub async fn all_claimed(
        &self,
        handle: &str,
        page_size: Option<u32>,
    ) -> Result<Vec<ClaimedItem>, ClientError> {
        let mut items = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self
                .claimed_page(handle, cursor.as_deref(), page_size)
                .await?;
            items.extend(page.items);
            match page.next_cursor {
                Some(next) if page.has_next_page && seen.insert(next.clone()) => {
                    cursor = Some(next)
                }
                _ => break,
            }
        }
        Ok(items)
    }

    /// Claimed rows for either envelope variant. Coin envelopes page through
    /// their claim table; NFT envelopes page through their claimed address
    /// list, one NFT per address.
    pub async fn envelope_claimed(
        &self,
        envelope: &Envelope,
        cursor: Option<&str>,
        limit: Option<u32>,
    ) -> Result<ClaimedPage, ClientError> {
        match &envelope.kind {
            EnvelopeKind::Coin(coin) => match coin.claim_table.as_deref() {
                Some(handle) => self.claimed_page(handle, cursor, limit).await,
                None => Ok(empty_page()),
            },
            EnvelopeKind::Nft(nft) => Ok(page_addresses(&nft.claimed_address, cursor, limit)),
        }
    }
}

fn empty_page() -> ClaimedPage {
    ClaimedPage {
        items: vec![],
        next_cursor: None,
        has_next_page: false,
    }
}

/// Offset pagination over an in-memory address list; the cursor is the
/// offset of the next row.
pub fn page_addresses(addresses: &[String], cursor: Option<&str>, limit: Option<u32>) -> ClaimedPage {
    let start = cursor
        .and_then(|c| c.parse::<usize>().ok())
        .unwrap_or(0)
        .min(addresses.len());
    let end = start
        .saturating_add(page_limit(limit) as usize)
        .min(addresses.len());

    let items = addresses[start..end]
        .iter()
        .map(|address| ClaimedItem {
            address: address.clone(),
            amount: Uint256::one(),
            claimed_at: None,
        })
        .collect();
    let has_next_page = end < addresses.len();
    ClaimedPage {
        items,
        next_cursor: has_next_page.then(|| end.to_string()),
        has_next_page,
    }
}
