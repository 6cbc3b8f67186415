//! Bootstrap configuration loading
//!
//! Config file resolution priority:
//! 1. Explicit path (command-line argument)
//! 2. `KIOSK_CONFIG` environment variable
//! 3. User config directory (`<config_dir>/kiosk/config.toml`)
//! 4. `/etc/kiosk/config.toml` (Linux only)
//!
//! A missing file is not an error: compiled defaults are used instead.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "KIOSK_CONFIG";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Base URL of the content backend
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Paired screen identifier
    #[serde(default)]
    pub screen_id: Option<String>,

    /// Local HTTP/SSE port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Playlist/status refresh cadence
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Scheduling tick cadence
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Hold time for images without an explicit duration
    #[serde(default = "default_image_hold_ms")]
    pub default_image_hold_ms: u64,

    /// Backend request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            screen_id: None,
            port: default_port(),
            refresh_interval_secs: default_refresh_interval_secs(),
            tick_interval_ms: default_tick_interval_ms(),
            default_image_hold_ms: default_image_hold_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_server_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_port() -> u16 {
    5780
}

fn default_refresh_interval_secs() -> u64 {
    5
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_image_hold_ms() -> u64 {
    3000
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Read and parse a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Locate and load the config file, falling back to defaults
    ///
    /// An explicitly named file (CLI or env) must exist and parse; a missing
    /// file in the default locations only produces a warning.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            let config = Self::from_file(path)?;
            info!("Loaded configuration from {}", path.display());
            return Ok((config, Some(path.to_path_buf())));
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            let config = Self::from_file(&path)?;
            info!("Loaded configuration from {} ({})", path.display(), CONFIG_ENV_VAR);
            return Ok((config, Some(path)));
        }

        match default_config_locations().into_iter().find(|p| p.exists()) {
            Some(path) => {
                let config = Self::from_file(&path)?;
                info!("Loaded configuration from {}", path.display());
                Ok((config, Some(path)))
            }
            None => {
                warn!("No config file found, using built-in defaults");
                Ok((Self::default(), None))
            }
        }
    }
}

/// Candidate config file locations for the platform, highest priority first
pub fn default_config_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("kiosk").join("config.toml"));
    }
    if cfg!(target_os = "linux") {
        locations.push(PathBuf::from("/etc/kiosk/config.toml"));
    }
    locations
}
