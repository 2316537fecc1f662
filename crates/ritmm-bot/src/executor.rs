//! Applies quote decisions through the order gateway.
//!
//! Tight decisions cancel the tracked quote before placing the new pair.
//! A cancel the exchange rejects (order already filled or gone) counts as
//! done; any other cancel failure aborts the replace and leaves the tracked
//! ids in place for the next round.

use std::sync::Arc;

use ritmm_core::{OrderId, OrderRequest, Ticker};
use ritmm_gateway::{GatewayResult, OrderGateway};
use ritmm_mm::{PlannedOrder, Quote, QuoteDecision, QuoteEngine, TickerConfig};
use ritmm_telemetry::Metrics;
use tracing::{debug, info, warn};

/// What one decision did on the exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub cancelled: usize,
    pub placed: Vec<Quote>,
}

/// Order placement and cancellation for the round loop.
pub struct OrderExecutor {
    gateway: Arc<dyn OrderGateway>,
}

impl OrderExecutor {
    pub fn new(gateway: Arc<dyn OrderGateway>) -> Self {
        Self { gateway }
    }

    /// Apply `decision` for `ticker_cfg`, updating the engine's tracked
    /// quote for tight decisions.
    ///
    /// On error the tracked state reflects whatever reached the exchange.
    pub async fn execute(
        &self,
        engine: &mut QuoteEngine,
        ticker_cfg: &TickerConfig,
        decision: QuoteDecision,
    ) -> GatewayResult<ExecutionReport> {
        let ticker = &ticker_cfg.ticker;
        let mut report = ExecutionReport::default();

        match decision {
            QuoteDecision::Tight { cancels, bid, ask } => {
                report.cancelled = self.cancel_tracked(ticker, &cancels).await?;
                engine.clear_tracked(ticker);

                let bid_quote = self.place(ticker, &bid).await?;
                report.placed.push(bid_quote.clone());

                let ask_quote = match self.place(ticker, &ask).await {
                    Ok(q) => q,
                    Err(e) => {
                        engine.record_tight_quote(ticker, Some(bid_quote), None);
                        return Err(e);
                    }
                };
                report.placed.push(ask_quote.clone());
                engine.record_tight_quote(ticker, Some(bid_quote), Some(ask_quote));
            }
            QuoteDecision::TightCrossed { cancels, bid, ask } => {
                report.cancelled = self.cancel_tracked(ticker, &cancels).await?;
                engine.clear_tracked(ticker);
                debug!(%ticker, %bid, %ask, "Tight quote would cross, not placing");
            }
            QuoteDecision::Wide { buy, sell } => {
                for order in buy.iter().chain(sell.iter()) {
                    let quote = self.place(ticker, order).await?;
                    report.placed.push(quote);
                }
            }
        }

        Ok(report)
    }

    /// Cancel `ids` in order. Returns how many the exchange accepted.
    async fn cancel_tracked(&self, ticker: &Ticker, ids: &[OrderId]) -> GatewayResult<usize> {
        let mut cancelled = 0;
        for &order_id in ids {
            match self.gateway.cancel_order(order_id).await {
                Ok(()) => {
                    cancelled += 1;
                    Metrics::order_cancelled(ticker.as_str());
                }
                Err(e) if e.is_rejection() => {
                    warn!(%ticker, %order_id, error = %e, "Cancel rejected, treating order as gone");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(cancelled)
    }

    async fn place(&self, ticker: &Ticker, order: &PlannedOrder) -> GatewayResult<Quote> {
        let request = OrderRequest::limit(ticker.clone(), order.side, order.size, order.price);
        let order_id = self.gateway.place_order(&request).await?;

        info!(
            %ticker,
            side = %order.side,
            price = %order.price,
            size = %order.size,
            reason = order.reason.as_str(),
            %order_id,
            "Order placed"
        );
        Metrics::order_placed(ticker.as_str(), &order.side.to_string(), order.reason.as_str());

        Ok(Quote {
            side: order.side,
            price: order.price,
            size: order.size,
            order_id,
        })
    }
}
