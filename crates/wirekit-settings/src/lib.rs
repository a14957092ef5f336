//! WireKit Settings Crate
//!
//! Runtime configuration for the wires engine: grid defaults, batching
//! limits and event bus history, loaded from JSON or TOML files.

pub mod config;
pub mod error;

pub use config::{default_config_path, BatchSettings, Config, EventSettings, LayoutSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
