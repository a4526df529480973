use chrono::{DateTime, Utc};
use reveal_core::types::amount;
use reveal_core::{OutcomeView, SettlementSummary, U256};
use serde::{Deserialize, Serialize};

/// A local action that has not settled yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequest {
    #[serde(with = "amount")]
    pub stake_wei: U256,
    #[serde(with = "amount")]
    pub fee_wei: U256,
    pub submitted_at: DateTime<Utc>,
    /// Wheel rotation when the idle spin started.
    pub spin_origin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum RevealPhase {
    Idle,
    AwaitingAcceptance {
        request: PendingRequest,
        deadline: DateTime<Utc>,
    },
    AwaitingSettlement {
        request: PendingRequest,
        sequence_number: u64,
        #[serde(with = "amount")]
        accepted_stake_wei: U256,
        deadline: DateTime<Utc>,
    },
    Revealing {
        sequence_number: u64,
        view: OutcomeView,
        summary: SettlementSummary,
        started_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    },
}

impl RevealPhase {
    pub fn name(&self) -> &'static str {
        match self {
            RevealPhase::Idle => "idle",
            RevealPhase::AwaitingAcceptance { .. } => "awaiting-acceptance",
            RevealPhase::AwaitingSettlement { .. } => "awaiting-settlement",
            RevealPhase::Revealing { .. } => "revealing",
        }
    }

    /// Sequence number being tracked, if any.
    pub fn sequence_number(&self) -> Option<u64> {
        match self {
            RevealPhase::AwaitingSettlement {
                sequence_number, ..
            }
            | RevealPhase::Revealing {
                sequence_number, ..
            } => Some(*sequence_number),
            _ => None,
        }
    }
}

/// Everything the reducer needs between inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealState {
    pub phase: RevealPhase,
    /// Resting wheel rotation in degrees, kept across rounds.
    pub rotation: f64,
}

impl Default for RevealState {
    fn default() -> Self {
        Self {
            phase: RevealPhase::Idle,
            rotation: 0.0,
        }
    }
}

impl RevealState {
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, RevealPhase::Idle)
    }

    pub(crate) fn with_phase(&self, phase: RevealPhase) -> Self {
        Self {
            phase,
            rotation: self.rotation,
        }
    }
}
