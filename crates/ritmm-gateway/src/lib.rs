//! Exchange order gateway for ritmm.
//!
//! [`OrderGateway`] is the only boundary the round loop talks to.
//! [`RestGateway`] implements it against the RIT client REST API:
//! - `X-API-Key` header on every request
//! - HTTP 429 waits the server hint and re-issues the same request
//! - HTTP 401 surfaces as a terminal [`GatewayError::Auth`]

pub mod config;
pub mod error;
pub mod gateway;
pub mod rest;

pub use config::GatewayConfig;
pub use error::{GatewayError, GatewayResult};
pub use gateway::OrderGateway;
pub use rest::RestGateway;
