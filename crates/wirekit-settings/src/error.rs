//! Failures of config file handling.
//!
//! [`SettingsError`] covers the file round trip (reading, parsing, encoding,
//! writing). [`ConfigError`] is what `Config::validate` and the file format
//! detection reject before anything touches the disk.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The platform reports no per-user config directory
    #[error("No platform config directory")]
    NoConfigDirectory,

    #[error("Malformed JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Cannot encode config as TOML: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] ConfigError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Only `.json` and `.toml` files are understood
    #[error("Unsupported config file extension: {0}")]
    UnsupportedExtension(String),

    /// Grid dimensions, settle passes and history size must all be > 0
    #[error("'{key}' must be greater than zero")]
    MustBePositive { key: &'static str },
}

pub type SettingsResult<T> = Result<T, SettingsError>;

pub type ConfigResult<T> = Result<T, ConfigError>;
