//! Error types for ritmm-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    #[error("Unknown order action: {0}")]
    UnknownAction(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
