//! Maker error types.

use ritmm_book::BookError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MakerError {
    #[error("Invalid maker configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Book(#[from] BookError),
}

pub type MakerResult<T> = Result<T, MakerError>;
