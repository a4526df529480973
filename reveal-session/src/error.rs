use reveal_core::RevealError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Reveal error: {0}")]
    Reveal(#[from] RevealError),

    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),

    #[error("Session channel closed")]
    ChannelClosed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SessionError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Problems surfaced to the player. None of them are retried; the player
/// resubmits if they want another round.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "fault", rename_all = "camelCase")]
pub enum RevealFault {
    #[error("Could not render outcome: event is missing {field}")]
    MissingEventField { field: String },

    #[error("Request was not accepted within {timeout_ms}ms")]
    AcceptanceTimedOut { timeout_ms: u64 },

    #[error("Request {sequence_number} did not settle within {timeout_ms}ms")]
    SettlementTimedOut { sequence_number: u64, timeout_ms: u64 },

    #[error("Contradicting event for request {sequence_number}: {reason}")]
    ContradictingEvent { sequence_number: u64, reason: String },

    #[error("Reveal of request {sequence_number} interrupted by a new request")]
    AnimationInterrupted { sequence_number: u64 },

    #[error("Could not render outcome for request {sequence_number}: {reason}")]
    RenderFailed { sequence_number: u64, reason: String },
}
