//! Configuration loading and data file resolution
//!
//! Settings are resolved by priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: the caller gets defaults and a
//! warning.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming the data file to preload
pub const DATA_FILE_ENV: &str = "ESR_DATA_FILE";

/// Default HTTP port of the dashboard service
pub const DEFAULT_PORT: u16 = 5790;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";

/// Data file names tried when nothing else is configured
pub const DEFAULT_DATA_CANDIDATES: [&str; 2] = [
    "Etudes_relations_amoureuses.xlsx",
    "../Etudes_relations_amoureuses.xlsx",
];

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TomlConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Survey data to preload at startup (optional)
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            data_file: None,
            logging: LoggingConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load from `path`; a missing file yields defaults with a warning
    ///
    /// An existing file that fails to parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Config file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from an explicit path or, failing that, the platform default
    /// location
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) => Self::load(&path),
                None => {
                    warn!("Could not determine config directory, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }
}

/// `<config_dir>/esr/esr-dash.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("esr").join("esr-dash.toml"))
}

/// Data file to preload, by priority CLI → environment → TOML → first
/// existing default candidate (relative to `base`)
///
/// `None` when nothing is configured and no candidate exists. Explicitly
/// configured paths are returned whether or not they exist; loading
/// reports the failure.
pub fn resolve_data_file(
    cli_arg: Option<&Path>,
    config: &TomlConfig,
    base: &Path,
) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(DATA_FILE_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    if let Some(path) = &config.data_file {
        return Some(path.clone());
    }

    DEFAULT_DATA_CANDIDATES
        .iter()
        .map(|name| base.join(name))
        .find(|path| path.is_file())
}
