//! Configuration for the wires engine
//!
//! Provides configuration file handling, defaults and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Layout defaults (grid dimensions for new containers)
//! - Batching (how many flushes `settle` may run)
//! - Events (container event bus history)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use wirekit_core::EventBusConfig;

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

const CONFIG_DIR_NAME: &str = "wirekit";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Grid defaults applied to containers created without explicit dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Rows of the default grid
    pub default_rows: u32,
    /// Columns of the default grid
    pub default_columns: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            default_rows: 1,
            default_columns: 1,
        }
    }
}

/// Attribute change batching limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Upper bound on flushes performed by a single settle
    pub max_settle_passes: u32,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            max_settle_passes: 16,
        }
    }
}

/// Container event bus settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventSettings {
    /// Record published events for later inspection
    pub enable_history: bool,
    /// Maximum number of events kept per container
    pub max_history_size: usize,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            enable_history: false,
            max_history_size: 256,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub batching: BatchSettings,
    #[serde(default)]
    pub events: EventSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)
            .map_err(|source| SettingsError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let checks = [
            ("layout.default_rows", self.layout.default_rows as usize),
            ("layout.default_columns", self.layout.default_columns as usize),
            (
                "batching.max_settle_passes",
                self.batching.max_settle_passes as usize,
            ),
            ("events.max_history_size", self.events.max_history_size),
        ];
        match checks.into_iter().find(|(_, value)| *value == 0) {
            Some((key, _)) => Err(ConfigError::MustBePositive { key }),
            None => Ok(()),
        }
    }

    /// Merge another config into this one, taking every section of `other`
    /// that differs from the defaults.
    pub fn merge(&mut self, other: &Config) {
        if other.layout != LayoutSettings::default() {
            self.layout = other.layout.clone();
        }
        if other.batching != BatchSettings::default() {
            self.batching = other.batching.clone();
        }
        if other.events != EventSettings::default() {
            self.events = other.events.clone();
        }
    }

    /// Event bus configuration for a newly created container
    pub fn event_bus_config(&self) -> EventBusConfig {
        EventBusConfig {
            enable_history: self.events.enable_history,
            max_history_size: self.events.max_history_size,
            ..EventBusConfig::default()
        }
    }
}

/// Platform config file location (`<config dir>/wirekit/config.toml`)
pub fn default_config_path() -> SettingsResult<PathBuf> {
    let dir = dirs::config_dir().ok_or(SettingsError::NoConfigDirectory)?;
    Ok(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedExtension(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
