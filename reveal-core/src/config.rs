use crate::deck::{standard_deck, DealLayout};
use crate::error::{Result, RevealError};
use crate::mines::MinesLayout;
use crate::paytable::Paytable;
use crate::seed::{HashAlgorithm, DEFAULT_SALT};
use crate::wheel::SpinProfile;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub salt: u64,
    pub hash: HashAlgorithm,
    pub deal: DealLayout,
    /// How long the deal animation runs before the hands are shown.
    pub deal_delay: Duration,
    pub wheel_segments: u16,
    pub spin: SpinProfile,
    pub paytable: Paytable,
    pub mines: MinesLayout,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            salt: DEFAULT_SALT,
            hash: HashAlgorithm::Keccak256,
            deal: DealLayout::default(),
            deal_delay: Duration::from_millis(700),
            wheel_segments: 13,
            spin: SpinProfile::default(),
            paytable: Paytable::default(),
            mines: MinesLayout::default(),
        }
    }
}

impl RevealConfig {
    pub fn validate(&self) -> Result<()> {
        if self.wheel_segments == 0 {
            return Err(RevealError::config("Wheel must have at least one segment"));
        }

        if self.paytable.bins() != 0 && self.paytable.bins() != self.wheel_segments as usize {
            return Err(RevealError::config(format!(
                "Paytable has {} bins but the wheel has {} segments",
                self.paytable.bins(),
                self.wheel_segments
            )));
        }

        if self.deal.players == 0 {
            return Err(RevealError::config("Deal needs at least one player"));
        }

        let deck_size = standard_deck().len();
        let needed = self.deal.cards_needed()?;
        if needed > deck_size {
            return Err(RevealError::config(format!(
                "Deal layout needs {} cards, deck has {}",
                needed, deck_size
            )));
        }

        self.mines.validate()?;

        if !self.spin.idle_speed.is_finite() || self.spin.idle_speed < 0.0 {
            return Err(RevealError::config("Idle speed must be a non-negative number"));
        }

        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
