//! Prometheus metrics and structured logging for ritmm.
//!
//! - Prometheus counters and gauges for rounds, orders, faults and book state
//! - Structured logging with tracing (JSON in production, pretty otherwise)

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
