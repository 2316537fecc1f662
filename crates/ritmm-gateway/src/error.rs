//! Gateway error types.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// API key rejected. Terminal for the whole run.
    #[error("Authentication failed, check the API key")]
    Auth,

    /// Still rate limited after the configured number of retries.
    #[error("Rate limited after {attempts} retries (last wait {retry_after:?})")]
    RateLimited { retry_after: Duration, attempts: u32 },

    /// Non-success response other than 401/429.
    #[error("Request rejected: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid gateway configuration: {0}")]
    InvalidConfig(String),
}

impl GatewayError {
    /// Whether the run must stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Auth | Self::InvalidConfig(_))
    }

    /// Whether the exchange answered and refused the request.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::RateLimited { .. } => "rate_limited",
            Self::Rejected { .. } => "rejected",
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
