//! Gateway configuration.

use crate::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the client API, without trailing slash.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Value of the `X-API-Key` header. Usually supplied via environment.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Retries of one request on HTTP 429 before giving up.
    #[serde(default = "default_max_rate_limit_retries")]
    pub max_rate_limit_retries: u32,

    /// Wait used when a 429 carries neither `Retry-After` nor a `wait` field.
    #[serde(default = "default_retry_wait_ms")]
    pub default_retry_wait_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            request_timeout_ms: default_request_timeout_ms(),
            max_rate_limit_retries: default_max_rate_limit_retries(),
            default_retry_wait_ms: default_retry_wait_ms(),
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("max_rate_limit_retries", &self.max_rate_limit_retries)
            .field("default_retry_wait_ms", &self.default_retry_wait_ms)
            .finish()
    }
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn default_retry_wait(&self) -> Duration {
        Duration::from_millis(self.default_retry_wait_ms)
    }

    pub fn validate(&self) -> GatewayResult<()> {
        if self.api_url.trim().is_empty() {
            return Err(GatewayError::InvalidConfig("api_url is empty".into()));
        }
        if self.api_key.trim().is_empty() {
            return Err(GatewayError::InvalidConfig("api_key is empty".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(GatewayError::InvalidConfig(
                "request_timeout_ms must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn default_api_url() -> String {
    "http://localhost:9999/v1".to_string()
}
fn default_request_timeout_ms() -> u64 {
    5_000
}
fn default_max_rate_limit_retries() -> u32 {
    10
}
fn default_retry_wait_ms() -> u64 {
    1_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.api_url, "http://localhost:9999/v1");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.default_retry_wait(), Duration::from_secs(1));
        // No key by default.
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GatewayConfig {
            api_key: "SECRET123".into(),
            ..Default::default()
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("SECRET123"));
        assert!(config.validate().is_ok());
    }
}
