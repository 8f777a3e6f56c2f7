//! # Configuration Management Module
//!
//! Engine configuration loaded from a TOML file, with serde-backed defaults
//! and validation. The configuration is deliberately small: game metadata for
//! save-file naming, the saves section (directory, undo depth), and the log
//! level. Presentation-layer preferences live with the presentation layer,
//! not here.
//!
//! ```toml
//! [game]
//! name = "Cloak of Darkness"
//!
//! [saves]
//! directory = "saves"
//! undo_depth = 10
//!
//! [logging]
//! level = "info"
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Game metadata used for save-file naming and window titles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: "Untitled Story".to_string(),
        }
    }
}

/// Save-file and undo settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavesConfig {
    /// Directory save slots are written under.
    #[serde(default = "default_saves_dir")]
    pub directory: String,
    /// Maximum number of in-memory undo checkpoints kept.
    #[serde(default = "default_undo_depth")]
    pub undo_depth: usize,
}

fn default_saves_dir() -> String {
    "saves".to_string()
}

fn default_undo_depth() -> usize {
    10
}

impl Default for SavesConfig {
    fn default() -> Self {
        Self {
            directory: default_saves_dir(),
            undo_depth: default_undo_depth(),
        }
    }
}

/// Logging settings consumed by the host's logger setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub saves: SavesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load and validate configuration from a TOML file.
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("failed to read config file {path}: {e}"))?;
        let config: EngineConfig =
            toml::from_str(&content).map_err(|e| anyhow!("invalid config file {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Write a default configuration file.
    pub async fn create_default(path: &str) -> Result<()> {
        let config = EngineConfig::default();
        let content = toml::to_string_pretty(&config)?;
        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("failed to write config file {path}: {e}"))?;
        Ok(())
    }

    /// Check all values that can be wrong in a way serde cannot catch.
    pub fn validate(&self) -> Result<()> {
        if self.game.name.trim().is_empty() {
            return Err(anyhow!("game.name must not be empty"));
        }
        if self.saves.undo_depth == 0 {
            return Err(anyhow!("saves.undo_depth must be at least 1"));
        }
        match self.logging.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            other => Err(anyhow!("logging.level {other:?} is not a log level")),
        }
    }

    /// Path of a named save slot under the configured saves directory.
    pub fn save_path(&self, slot: &str) -> PathBuf {
        PathBuf::from(&self.saves.directory).join(format!("{slot}.fab"))
    }
}
