use crate::config::RevealConfig;
use crate::deck::{deal_from_seed, Deal};
use crate::error::Result;
use crate::event::SettledEvent;
use crate::mines::MinesBoard;
use crate::seed::{derive_seed, derive_unsalted_seed, Seed, SeedInput};
use crate::types::U256;
use crate::wheel::{SpinPlan, WheelGeometry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Poker,
    Wheel,
    Mines,
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameKind::Poker => f.write_str("poker"),
            GameKind::Wheel => f.write_str("wheel"),
            GameKind::Mines => f.write_str("mines"),
        }
    }
}

impl FromStr for GameKind {
    type Err = crate::RevealError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "poker" => Ok(Self::Poker),
            "wheel" | "spinwheel" => Ok(Self::Wheel),
            "mines" => Ok(Self::Mines),
            other => Err(crate::RevealError::config(format!("unknown game: {other}"))),
        }
    }
}

/// Rendered form of a settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OutcomeView {
    Deal {
        seed: Seed,
        deal: Deal,
    },
    Wheel {
        segment: u16,
        target_angle: f64,
        plan: SpinPlan,
    },
    Grid {
        seed: Seed,
        board: MinesBoard,
    },
}

impl OutcomeView {
    pub fn animation_duration(&self, config: &RevealConfig) -> Duration {
        match self {
            OutcomeView::Deal { .. } => config.deal_delay,
            OutcomeView::Wheel { plan, .. } => plan.duration,
            OutcomeView::Grid { .. } => config.mines.reveal_duration(),
        }
    }

    /// Resting angle once the animation ends; `None` unless it is a wheel.
    pub fn resting_rotation(&self) -> Option<f64> {
        match self {
            OutcomeView::Deal { .. } | OutcomeView::Grid { .. } => None,
            OutcomeView::Wheel { plan, .. } => Some(plan.final_angle()),
        }
    }
}

/// Turns settlements into views according to a validated [`RevealConfig`].
#[derive(Debug, Clone)]
pub struct OutcomeRenderer {
    config: RevealConfig,
    wheel: WheelGeometry,
}

impl OutcomeRenderer {
    pub fn new(config: RevealConfig) -> Result<Self> {
        config.validate()?;
        let wheel = WheelGeometry::new(config.wheel_segments)?;
        Ok(Self { config, wheel })
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn wheel(&self) -> &WheelGeometry {
        &self.wheel
    }

    pub fn seed_for(&self, event: &SettledEvent) -> Seed {
        let input = SeedInput::from_event(event, U256::from(self.config.salt));
        derive_seed(&input, self.config.hash)
    }

    pub fn render_deal(&self, event: &SettledEvent) -> Result<OutcomeView> {
        let seed = self.seed_for(event);
        let deal = deal_from_seed(&seed, &self.config.deal, self.config.hash)?;
        Ok(OutcomeView::Deal { seed, deal })
    }

    /// The grid seed leaves the salt word out of the preimage.
    pub fn grid_seed_for(&self, event: &SettledEvent) -> Seed {
        let input = SeedInput::from_event(event, U256::ZERO);
        derive_unsalted_seed(&input, self.config.hash)
    }

    pub fn render_grid(&self, event: &SettledEvent) -> OutcomeView {
        let seed = self.grid_seed_for(event);
        let board = MinesBoard::new(
            &seed,
            &self.config.mines,
            event.outcome_index,
            self.config.hash,
        );
        OutcomeView::Grid { seed, board }
    }

    pub fn render_wheel(&self, event: &SettledEvent, current_rotation: f64) -> Result<OutcomeView> {
        let target_angle = self.wheel.target_angle(event.outcome_index as u64)?;
        let plan = SpinPlan::settle(current_rotation, target_angle, &self.config.spin);
        Ok(OutcomeView::Wheel {
            segment: event.outcome_index as u16,
            target_angle,
            plan,
        })
    }

    pub fn render(
        &self,
        game: GameKind,
        event: &SettledEvent,
        current_rotation: f64,
    ) -> Result<OutcomeView> {
        let view = match game {
            GameKind::Poker => self.render_deal(event)?,
            GameKind::Wheel => self.render_wheel(event, current_rotation)?,
            GameKind::Mines => self.render_grid(event),
        };
        tracing::debug!(
            "Rendered {} outcome for seq {} (bin {})",
            game,
            event.sequence_number,
            event.outcome_index
        );
        Ok(view)
    }
}
