//! ritmm: market-making client for the RIT case simulator.
//!
//! Main application that orchestrates all components:
//! - Case clock polling and the per-ticker round loop
//! - Book aggregation, imbalance and fair value signals
//! - Quote decisions applied through the order gateway
//! - Risk cancel-all after each ticker

pub mod app;
pub mod config;
pub mod error;
pub mod executor;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use executor::{ExecutionReport, OrderExecutor};
