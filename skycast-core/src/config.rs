use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::model::Coordinates;
use crate::units::UnitPreferences;

/// Top-level configuration stored on disk.
///
/// Every field has a default, so a missing config file is not an error and
/// the first run needs no setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Unit preferences applied at startup.
    pub units: UnitPreferences,

    /// Language passed to the geocoding services.
    pub language: String,

    /// Quiet period before a suggestion request is issued, in milliseconds.
    pub debounce_ms: u64,

    /// Maximum number of candidates a suggestion query returns.
    pub suggestion_limit: usize,

    /// Minimum query length before any suggestion request is issued.
    pub min_query_len: usize,

    /// Pinned coordinates for the primary position capability.
    ///
    /// Example TOML:
    /// [position]
    /// latitude = 52.52
    /// longitude = 13.405
    pub position: Option<Coordinates>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            units: UnitPreferences::default(),
            language: "en".to_string(),
            debounce_ms: 300,
            suggestion_limit: 5,
            min_query_len: 3,
            position: None,
        }
    }
}

impl Config {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
