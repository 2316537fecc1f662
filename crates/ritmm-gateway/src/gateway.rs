//! The order gateway boundary.

use async_trait::async_trait;
use ritmm_core::{CaseState, OpenOrder, OrderId, OrderRequest, Position, RawBook, Ticker};

use crate::error::GatewayResult;

/// Everything the round loop reads from or writes to the exchange.
///
/// Implementations retry rate-limited calls internally and report an
/// authentication failure as [`GatewayError::Auth`](crate::GatewayError::Auth).
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Current case tick and status.
    async fn get_tick(&self) -> GatewayResult<CaseState>;

    /// Up to `depth` raw entries per side, best price first.
    async fn get_book(&self, ticker: &Ticker, depth: usize) -> GatewayResult<RawBook>;

    async fn get_position(&self, ticker: &Ticker) -> GatewayResult<Position>;

    async fn get_open_orders(&self, ticker: &Ticker) -> GatewayResult<Vec<OpenOrder>>;

    async fn count_open_orders(&self, ticker: &Ticker) -> GatewayResult<usize> {
        Ok(self.get_open_orders(ticker).await?.len())
    }

    async fn place_order(&self, request: &OrderRequest) -> GatewayResult<OrderId>;

    async fn cancel_order(&self, order_id: OrderId) -> GatewayResult<()>;

    /// Cancel every resting order for `ticker`.
    async fn cancel_all(&self, ticker: &Ticker) -> GatewayResult<()>;
}
