use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("name is longer than {max} characters")]
    NameTooLong { max: usize },

    #[error("description is longer than {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("{field} must be greater than zero")]
    Zero { field: String },

    #[error("total amount {amount} cannot be split across {count} envelopes")]
    AmountBelowCount { amount: String, count: u64 },

    #[error("start time {start} must be before end time {end}")]
    InvalidTimeWindow { start: u64, end: u64 },

    #[error("end time {end} is already in the past (now: {now})")]
    AlreadyEnded { end: u64, now: u64 },

    #[error("coin type is required")]
    MissingCoinType,

    #[error("nft type is required")]
    MissingNftType,

    #[error("at least one nft is required")]
    NoNfts,

    #[error("nft {id} is listed more than once")]
    DuplicateNft { id: String },

    #[error("reward {reward} exceeds the pool of {pool}")]
    RewardExceedsPool { reward: String, pool: String },

    #[error("pool {pool} is not a whole multiple of reward {reward}")]
    UnevenRewardSplit { reward: String, pool: String },

    #[error("invalid amount: {input}")]
    InvalidAmount { input: String },
}
