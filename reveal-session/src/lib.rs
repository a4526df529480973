//! Reveal orchestration for Entropy-settled games
//!
//! Correlates a local action with the contract's "accepted" and "settled"
//! events and produces the outcome view once, for the right request only.

pub mod config;
pub mod error;
pub mod queue;
pub mod reducer;
pub mod session;
pub mod state;

pub use config::SessionConfig;
pub use error::{Result, RevealFault, SessionError};
pub use queue::{EventQueue, SessionDriver};
pub use reducer::{Reducer, RevealEffect, RevealInput, Transition};
pub use session::{RevealSession, SessionSnapshot};
pub use state::{PendingRequest, RevealPhase, RevealState};
