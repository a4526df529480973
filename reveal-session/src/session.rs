use crate::config::SessionConfig;
use crate::error::Result;
use crate::reducer::{Reducer, RevealEffect, RevealInput};
use crate::state::{RevealPhase, RevealState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One player's reveal flow for one game screen.
#[derive(Debug, Clone)]
pub struct RevealSession {
    id: Uuid,
    reducer: Reducer,
    state: RevealState,
}

impl RevealSession {
    pub fn new(config: SessionConfig) -> Result<Self> {
        let reducer = Reducer::new(config)?;
        let id = Uuid::new_v4();
        tracing::info!(
            "Session {} started for {} ({})",
            id,
            reducer.config().player,
            reducer.config().game
        );

        Ok(Self {
            id,
            reducer,
            state: RevealState::default(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        self.reducer.config()
    }

    pub fn state(&self) -> &RevealState {
        &self.state
    }

    pub fn phase(&self) -> &RevealPhase {
        &self.state.phase
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    /// Feed one input through the reducer and keep the resulting state.
    pub fn apply(&mut self, input: RevealInput) -> Vec<RevealEffect> {
        let before = self.state.phase.name();
        let transition = self.reducer.reduce(&self.state, &input);
        self.state = transition.state;

        let after = self.state.phase.name();
        if before != after {
            tracing::info!("Session {} moved {} -> {}", self.id, before, after);
        }

        for effect in &transition.effects {
            match effect {
                RevealEffect::Reveal {
                    sequence_number,
                    summary,
                    ..
                } => {
                    tracing::info!(
                        "Session {} revealing seq {} (bin {}, payout {} wei)",
                        self.id,
                        sequence_number,
                        summary.outcome_index,
                        summary.payout_wei
                    );
                }
                RevealEffect::Fault { fault } => {
                    tracing::warn!("Session {} fault: {}", self.id, fault);
                }
                _ => {}
            }
        }

        transition.effects
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            phase: self.state.phase.name().to_string(),
            sequence_number: self.state.phase.sequence_number(),
            rotation: self.state.rotation,
        }
    }
}

/// Session info for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub phase: String,
    pub sequence_number: Option<u64>,
    pub rotation: f64,
}
