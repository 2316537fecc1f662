//! Order book primitives for ritmm.
//!
//! Turns a raw, possibly duplicated price ladder into an
//! [`OrderBookSnapshot`] and derives the per-round signals the quote
//! engine consumes: cumulative depth imbalance and a notional-weighted
//! fair value.

pub mod aggregator;
pub mod error;
pub mod fair_value;
pub mod imbalance;

pub use aggregator::{aggregate, OrderBookSnapshot};
pub use error::{BookError, BookResult};
pub use fair_value::{fair_value, FairValue};
pub use imbalance::{imbalance, Imbalance, ImbalanceVector};
