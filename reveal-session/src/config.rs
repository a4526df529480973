use crate::error::{Result, SessionError};
use reveal_core::{Address, GameKind, RevealConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const MAX_TIMEOUT: Duration = Duration::from_secs(24 * 3600);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Local identity; events for any other player are ignored.
    pub player: Address,
    pub game: GameKind,
    #[serde(default = "default_acceptance_timeout")]
    pub acceptance_timeout: Duration,
    #[serde(default = "default_settlement_timeout")]
    pub settlement_timeout: Duration,
    #[serde(default)]
    pub reveal: RevealConfig,
}

fn default_acceptance_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_settlement_timeout() -> Duration {
    Duration::from_secs(120)
}

impl SessionConfig {
    pub fn new(player: Address, game: GameKind) -> Self {
        Self {
            player,
            game,
            acceptance_timeout: default_acceptance_timeout(),
            settlement_timeout: default_settlement_timeout(),
            reveal: RevealConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, timeout) in [
            ("acceptance", self.acceptance_timeout),
            ("settlement", self.settlement_timeout),
        ] {
            if timeout.is_zero() {
                return Err(SessionError::invalid_config(format!(
                    "{name} timeout must be greater than 0"
                )));
            }
            if timeout > MAX_TIMEOUT {
                return Err(SessionError::invalid_config(format!(
                    "{name} timeout must not exceed 24h"
                )));
            }
        }

        self.reveal.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Address {
        "0x00000000000000000000000000000000000000aa".parse().unwrap()
    }

    #[test]
    fn test_defaults_validate() {
        SessionConfig::new(player(), GameKind::Wheel).validate().unwrap();
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = SessionConfig::new(player(), GameKind::Poker);
        config.settlement_timeout = Duration::ZERO;
        assert!(matches!(config.validate(), Err(SessionError::InvalidConfig(_))));
    }

    #[test]
    fn test_minimal_json() {
        let json = r#"{
            "player": "0x00000000000000000000000000000000000000AA",
            "game": "poker"
        }"#;
        let config: SessionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.player, player());
        assert_eq!(config.acceptance_timeout, Duration::from_secs(60));
        assert_eq!(config.reveal.wheel_segments, 13);
    }
}
