//! Quoting strategy for ritmm.
//!
//! Provides the per-ticker decision engine:
//! - Tight-market two-sided quoting with cancel-before-replace
//! - Wide-market imbalance ladder, one order per side per round
//! - Inventory skew applied to every quoted price
//!
//! # Architecture
//!
//! ```text
//! OrderBookSnapshot + Imbalance + Position
//!        ↓
//!   QuoteEngine.decide()  → QuoteDecision (cancels + planned orders)
//!        ↓
//!   executor places/cancels, then QuoteEngine.record_tight_quote()
//! ```

pub mod config;
pub mod error;
pub mod quote_engine;

pub use config::{InventoryThresholds, MakerConfig, TickerConfig};
pub use error::{MakerError, MakerResult};
pub use quote_engine::{
    OrderReason, PlannedOrder, Quote, QuoteDecision, QuoteEngine, QuoteState, TrackedQuote,
};
