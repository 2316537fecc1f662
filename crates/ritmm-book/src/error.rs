//! Book error types.

use ritmm_core::BookSide;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookError {
    /// Aggregated ladder is shorter than the depth a decision needs.
    #[error("Malformed book: {required} levels required, {available} available")]
    MalformedBook { required: usize, available: usize },

    /// A side cannot supply the target fill notional.
    #[error("Insufficient {side} depth: {available} notional available, {target} required")]
    InsufficientDepth {
        side: BookSide,
        available: Decimal,
        target: Decimal,
    },

    /// Cumulative size through `level` is zero on `side`.
    #[error("Zero cumulative {side} size through level {level}")]
    ZeroCumulativeSize { side: BookSide, level: usize },

    #[error("Invalid target notional: {0}")]
    InvalidTarget(Decimal),
}

impl BookError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedBook { .. } => "malformed_book",
            Self::InsufficientDepth { .. } => "insufficient_depth",
            Self::ZeroCumulativeSize { .. } => "zero_cumulative_size",
            Self::InvalidTarget(_) => "invalid_target",
        }
    }
}

pub type BookResult<T> = Result<T, BookError>;
