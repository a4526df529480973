use thiserror::Error;

pub type Result<T> = std::result::Result<T, RevealError>;

#[derive(Error, Debug)]
pub enum RevealError {
    #[error("Missing event field: {0}")]
    MissingEventField(&'static str),

    #[error("Outcome index {index} out of range for {segments} segments")]
    OutcomeOutOfRange { index: u64, segments: u16 },

    #[error("Insufficient cards: need {needed}, have {available}")]
    InsufficientCards { needed: usize, available: usize },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RevealError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn invalid_seed(msg: impl Into<String>) -> Self {
        Self::InvalidSeed(msg.into())
    }
}
