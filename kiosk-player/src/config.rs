//! Configuration management for kiosk-player
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments / environment variables (via clap)
//! 2. TOML configuration file
//! 3. Built-in defaults (code constants)

use std::path::{Path, PathBuf};
use std::time::Duration;

use kiosk_common::config::TomlConfig;
use tracing::{info, warn};

use crate::error::{Error, Result};

const REFRESH_INTERVAL_RANGE_SECS: (u64, u64) = (1, 300);
const TICK_INTERVAL_RANGE_MS: (u64, u64) = (100, 10_000);

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the content backend, without trailing slash
    pub server_url: String,
    pub screen_id: String,
    pub port: u16,
    pub refresh_interval: Duration,
    pub tick_interval: Duration,
    pub default_image_hold: Duration,
    pub request_timeout: Duration,
    /// Default tracing filter level
    pub log_level: String,
    /// Log to this file instead of stderr
    pub log_file: Option<PathBuf>,
    /// File the settings came from, `None` for built-in defaults
    pub config_file: Option<PathBuf>,
}

/// Command-line configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub server_url: Option<String>,
    pub screen_id: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    /// Locate the TOML file, then apply overrides
    pub fn load(config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let (toml_config, config_file) = TomlConfig::load(config_path)?;
        let mut config = Self::from_parts(toml_config, overrides)?;
        config.config_file = config_file;
        Ok(config)
    }

    /// Merge a parsed TOML config with command-line overrides
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no screen identifier is available or the
    /// server URL is empty.
    pub fn from_parts(toml_config: TomlConfig, overrides: ConfigOverrides) -> Result<Self> {
        let screen_id = overrides
            .screen_id
            .or(toml_config.screen_id)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                Error::Config("screen_id is required (config file, --screen-id or KIOSK_SCREEN_ID)".to_string())
            })?;

        let server_url = overrides
            .server_url
            .unwrap_or(toml_config.server_url)
            .trim()
            .trim_end_matches('/')
            .to_string();
        if server_url.is_empty() {
            return Err(Error::Config("server_url must not be empty".to_string()));
        }

        let refresh_secs = clamp_setting(
            "refresh_interval_secs",
            toml_config.refresh_interval_secs,
            REFRESH_INTERVAL_RANGE_SECS,
        );
        let tick_ms = clamp_setting(
            "tick_interval_ms",
            toml_config.tick_interval_ms,
            TICK_INTERVAL_RANGE_MS,
        );

        let config = Self {
            server_url,
            screen_id,
            port: overrides.port.unwrap_or(toml_config.port),
            refresh_interval: Duration::from_secs(refresh_secs),
            tick_interval: Duration::from_millis(tick_ms),
            default_image_hold: Duration::from_millis(toml_config.default_image_hold_ms),
            request_timeout: Duration::from_secs(toml_config.request_timeout_secs.max(1)),
            log_level: toml_config.logging.level,
            log_file: toml_config.logging.file,
            config_file: None,
        };

        info!(
            "Configuration: screen={} server={} refresh={:?} tick={:?}",
            config.screen_id, config.server_url, config.refresh_interval, config.tick_interval
        );
        Ok(config)
    }
}

fn clamp_setting(name: &str, value: u64, (min, max): (u64, u64)) -> u64 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!("{} = {} out of range {}..={}, using {}", name, value, min, max, clamped);
    }
    clamped
}
