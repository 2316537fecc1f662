//! Inventory trip wire for ritmm.
//!
//! After each ticker is quoted, the [`RiskGovernor`] compares the position
//! and the number of resting orders against configured bands. Any breach
//! yields a single cancel-all for that ticker.

pub mod error;
pub mod governor;

pub use error::{RiskError, RiskResult};
pub use governor::{RiskAction, RiskBand, RiskBreach, RiskConfig, RiskGovernor};
