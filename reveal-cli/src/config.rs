use anyhow::Context;
use reveal_core::{Address, GameKind, RevealConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Player used by `replay` when none is given on the command line.
    pub player: Option<Address>,
    pub game: GameKind,
    pub acceptance_timeout: Duration,
    pub settlement_timeout: Duration,
    pub reveal: RevealConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            player: None,
            game: GameKind::Poker,
            acceptance_timeout: Duration::from_secs(60),
            settlement_timeout: Duration::from_secs(120),
            reveal: RevealConfig::default(),
        }
    }
}

impl CliConfig {
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("entropy-reveal")
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILE)
    }

    /// Load from `dir`, falling back to defaults when no file exists yet.
    pub fn load_or_default(dir: &Path) -> anyhow::Result<Self> {
        let path = Self::path_in(dir);
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.reveal.validate()?;
        Ok(config)
    }

    pub fn save(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = Self::path_in(dir);
        std::fs::write(&path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}
