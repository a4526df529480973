//! Deterministic outcome reveal for Entropy-settled games.
//!
//! A settled randomness request is turned into a seed and then into
//! something a player can look at: a shuffled and dealt deck, a wheel
//! rotation that stops on the winning segment, or a mines grid. Anyone holding the same event
//! fields gets the same view. The view is display-only; payout was already
//! fixed by the contract.

pub mod config;
pub mod deck;
pub mod error;
pub mod event;
pub mod mines;
pub mod outcome;
pub mod paytable;
pub mod seed;
pub mod types;
pub mod wheel;

pub use config::RevealConfig;
pub use deck::{deal, deal_from_seed, shuffle_with_seed, standard_deck, Card, Deal, DealLayout, Rank, Suit};
pub use error::{Result, RevealError};
pub use event::{AcceptedEvent, LogKind, ObservedLog, SettledEvent};
pub use mines::{chained_shuffle, MinesBoard, MinesLayout};
pub use outcome::{GameKind, OutcomeRenderer, OutcomeView};
pub use paytable::{Paytable, SettlementSummary};
pub use seed::{derive_seed, derive_unsalted_seed, HashAlgorithm, Seed, SeedInput, DEFAULT_SALT};
pub use types::{format_ether, parse_ether, parse_wei, Address, SignedAmount, U256};
pub use wheel::{SpinPlan, SpinProfile, WheelGeometry};
