//! Core domain types for the RIT market-making client.
//!
//! This crate provides the vocabulary shared by every other crate:
//! - `Price`, `Size`: Precision-safe numeric types
//! - `Ticker`, `DepthLevel`, `RawBook`: Market data as read from the exchange
//! - `Position`, `CaseState`: Per-round account and clock state
//! - `OrderSide`, `OrderType`, `OrderId`, `OrderRequest`: Order vocabulary

pub mod decimal;
pub mod error;
pub mod order;
pub mod types;

pub use decimal::{Price, Size};
pub use error::{CoreError, Result};
pub use order::{OpenOrder, OrderId, OrderRequest, OrderSide, OrderType};
pub use types::{BookSide, CaseState, CaseStatus, DepthLevel, Position, RawBook, Ticker};
