pub mod claimed;
pub mod coin;
pub mod envelope;
pub mod error;
pub mod form;
pub mod object;
pub mod raffle;
pub mod status;
pub mod types;

pub use claimed::format_claimed_item;
pub use coin::{format_units, normalize_address, normalize_coin_type, parse_units};
pub use envelope::format_envelope_data;
pub use error::FormError;
pub use form::{MoveArg, MoveCall};
pub use raffle::format_raffle_data;
pub use status::{derive_coin_status, derive_status};
pub use types::{
    ActivityStatus, ClaimedItem, ClaimedPage, CoinEnvelope, Envelope, EnvelopeKind, EnvelopeTheme,
    NftEnvelope, Raffle,
};
