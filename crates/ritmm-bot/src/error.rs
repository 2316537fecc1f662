//! Application error types.

use ritmm_book::BookError;
use ritmm_gateway::GatewayError;
use ritmm_mm::MakerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The exchange rejected the API key. Stops the loop.
    #[error("Authentication rejected by exchange")]
    Auth,

    #[error("Gateway error: {0}")]
    Gateway(GatewayError),

    #[error("Book error: {0}")]
    Book(#[from] BookError),

    #[error("Maker error: {0}")]
    Maker(#[from] MakerError),

    #[error("Risk error: {0}")]
    Risk(#[from] ritmm_risk::RiskError),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Auth => Self::Auth,
            other => Self::Gateway(other),
        }
    }
}

impl AppError {
    /// Errors that end the run rather than skip a ticker.
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Auth | Self::Config(_) => true,
            Self::Gateway(e) => e.is_terminal(),
            _ => false,
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Auth => "auth",
            Self::Gateway(e) => e.kind(),
            Self::Book(e) | Self::Maker(MakerError::Book(e)) => e.kind(),
            Self::Maker(_) => "maker",
            Self::Risk(_) => "risk",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_auth_maps_to_app_auth() {
        let err: AppError = GatewayError::Auth.into();
        assert!(matches!(err, AppError::Auth));
        assert!(err.is_terminal());
    }

    #[test]
    fn test_transport_is_not_terminal() {
        let err: AppError = GatewayError::Transport("connection reset".into()).into();
        assert!(!err.is_terminal());
        assert_eq!(err.kind(), "transport");
    }

    #[test]
    fn test_malformed_book_kind_through_maker() {
        let err: AppError = MakerError::Book(BookError::MalformedBook {
            required: 3,
            available: 1,
        })
        .into();
        assert!(!err.is_terminal());
        assert_eq!(err.kind(), "malformed_book");
    }
}
