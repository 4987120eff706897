//! Haul configuration.
//!
//! Loaded from `~/.haul/config.toml`. Defaults apply when the file is missing.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Days summed when recapping cycle usage: the 70-hour/8-day rule.
pub const DEFAULT_RECAP_DAYS: u8 = 8;

/// Haul configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// The driver used when `--driver` is not provided.
    pub default_driver: Option<String>,

    /// Number of days, today included, whose on-duty hours count toward
    /// the cycle.
    pub recap_days: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_driver: None,
            recap_days: DEFAULT_RECAP_DAYS,
        }
    }
}

impl Config {
    /// Load config from `~/.haul/config.toml`.
    /// A missing file yields the defaults; an invalid one is an error.
    pub fn load() -> Result<Self, String> {
        let path = Self::path().ok_or("could not determine home directory")?;

        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;

        Self::parse(&contents).map_err(|e| format!("invalid config at {}: {e}", path.display()))
    }

    /// Parse and validate config file contents.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(contents).map_err(|e| e.to_string())?;

        if config.recap_days == 0 {
            return Err("recap-days must be at least 1".to_string());
        }
        if config.default_driver.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err("default-driver is empty; remove it or set a name".to_string());
        }

        Ok(config)
    }

    /// The config file path: `~/.haul/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".haul").join("config.toml"))
    }
}
