//! Application configuration.

use crate::error::{AppError, AppResult};
use ritmm_gateway::GatewayConfig;
use ritmm_mm::MakerConfig;
use ritmm_risk::RiskConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "RITMM_CONFIG";
/// Overrides `gateway.api_key`.
pub const API_KEY_ENV: &str = "RITMM_API_KEY";
/// Overrides `gateway.api_url`.
pub const API_URL_ENV: &str = "RITMM_API_URL";

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pause between rounds (ms).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// The loop keeps polling while the case is active or the tick is
    /// below this value.
    #[serde(default = "default_end_tick")]
    pub end_tick: u32,

    /// Issue a cancel-all for every ticker when the loop exits.
    #[serde(default = "default_cancel_on_shutdown")]
    pub cancel_on_shutdown: bool,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub strategy: MakerConfig,

    #[serde(default)]
    pub risk: RiskConfig,
}

fn default_poll_interval_ms() -> u64 {
    200
}

fn default_end_tick() -> u32 {
    599
}

fn default_cancel_on_shutdown() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            end_tick: default_end_tick(),
            cancel_on_shutdown: default_cancel_on_shutdown(),
            gateway: GatewayConfig::default(),
            strategy: MakerConfig::default(),
            risk: RiskConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load, apply environment overrides and validate.
    ///
    /// A missing file at the default path falls back to defaults; an
    /// explicitly named file must exist.
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)?
            }
            None => {
                tracing::warn!(path = DEFAULT_CONFIG_PATH, "Config file not found, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {path}: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config {path}: {e}")))
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(API_URL_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, api_key: Option<String>, api_url: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.gateway.api_key = key;
        }
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.gateway.api_url = url;
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        self.strategy.validate()?;
        self.risk.validate()?;
        self.gateway
            .validate()
            .map_err(|e| AppError::Config(e.to_string()))?;
        if self.poll_interval_ms == 0 {
            return Err(AppError::Config("poll_interval_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
