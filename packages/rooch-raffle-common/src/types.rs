use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint256;

/// Lifecycle of an envelope or raffle box, always derived from the clock.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum ActivityStatus {
    NotStarted,
    Ongoing,
    Ended,
    /// Coin envelopes only: ended with nothing left to claim.
    AllClaimed,
}

/// Display fields an envelope creator can pick for the cover.
#[cw_serde]
#[derive(Default)]
pub struct EnvelopeTheme {
    pub cover_color: Option<String>,
    pub text_color: Option<String>,
}

/// A red envelope projected from its on-chain object.
#[cw_serde]
pub struct Envelope {
    pub id: String,
    pub sender: Option<String>,
    pub name: Option<String>,
    pub desc: Option<String>,
    pub image_url: Option<String>,
    pub theme: EnvelopeTheme,
    /// Milliseconds since the unix epoch
    pub start_time: Option<u64>,
    /// Milliseconds since the unix epoch
    pub end_time: Option<u64>,
    pub total_envelope: Option<u64>,
    pub claimed_envelope: Option<u64>,
    pub status: ActivityStatus,
    pub kind: EnvelopeKind,
}

#[cw_serde]
pub enum EnvelopeKind {
    Coin(CoinEnvelope),
    Nft(NftEnvelope),
}

#[cw_serde]
pub struct CoinEnvelope {
    pub coin_type: Option<String>,
    pub total_coin: Option<Uint256>,
    pub remaining_coin: Option<Uint256>,
    /// Handle of the `address -> amount` claim table
    pub claim_table: Option<String>,
}

#[cw_serde]
pub struct NftEnvelope {
    pub nft_type: Option<String>,
    pub claimed_address: Vec<String>,
    pub nft_table: Option<String>,
}

impl Envelope {
    pub fn is_coin(&self) -> bool {
        matches!(self.kind, EnvelopeKind::Coin(_))
    }

    /// Handle of the table listing who claimed, if the variant has one.
    pub fn claim_table(&self) -> Option<&str> {
        match &self.kind {
            EnvelopeKind::Coin(coin) => coin.claim_table.as_deref(),
            EnvelopeKind::Nft(_) => None,
        }
    }
}

/// A raffle box projected from its on-chain object.
#[cw_serde]
pub struct Raffle {
    pub id: String,
    pub creator: Option<String>,
    pub name: Option<String>,
    pub desc: Option<String>,
    pub image_url: Option<String>,
    pub coin_type: Option<String>,
    /// Size of the reward pool
    pub total_coin: Option<Uint256>,
    /// Paid out to each winning address
    pub reward_coin: Option<Uint256>,
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
    pub opened: bool,
    /// Everyone who entered, winners included
    pub claimed_address: Vec<String>,
    pub reward_address: Vec<String>,
    pub status: ActivityStatus,
}

impl Raffle {
    pub fn is_winner(&self, address: &str) -> bool {
        self.reward_address.iter().any(|a| a == address)
    }
}

#[cw_serde]
pub struct ClaimedItem {
    pub address: String,
    pub amount: Uint256,
    pub claimed_at: Option<u64>,
}

#[cw_serde]
pub struct ClaimedPage {
    pub items: Vec<ClaimedItem>,
    pub next_cursor: Option<String>,
    pub has_next_page: bool,
}
