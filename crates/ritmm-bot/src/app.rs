//! Main application orchestration.
//!
//! One cooperative loop polls the case clock and, while the case is
//! active, runs a round: each configured ticker in order goes through
//! position read, book aggregation, signals, a quote decision, execution
//! and a risk check. Every gateway call is awaited before the next.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::executor::OrderExecutor;
use ritmm_book::{aggregate, fair_value, imbalance, Imbalance, OrderBookSnapshot};
use ritmm_core::{BookSide, CaseState, CaseStatus, Position, Ticker};
use ritmm_gateway::{OrderGateway, RestGateway};
use ritmm_mm::{QuoteEngine, TickerConfig};
use ritmm_risk::{RiskAction, RiskGovernor};
use ritmm_telemetry::Metrics;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Main application.
pub struct Application {
    config: AppConfig,
    gateway: Arc<dyn OrderGateway>,
    executor: OrderExecutor,
    engine: QuoteEngine,
    governor: RiskGovernor,
    shutdown: CancellationToken,
    case: CaseState,
    rounds: u64,
}

impl Application {
    /// Create an application backed by the REST gateway.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let gateway = RestGateway::new(&config.gateway)?;
        Ok(Self::with_gateway(config, Arc::new(gateway)))
    }

    /// Create an application over any gateway.
    pub fn with_gateway(config: AppConfig, gateway: Arc<dyn OrderGateway>) -> Self {
        let engine = QuoteEngine::new(config.strategy.clone());
        let governor = RiskGovernor::new(&config.risk, config.strategy.position_limit);
        Self {
            executor: OrderExecutor::new(Arc::clone(&gateway)),
            gateway,
            engine,
            governor,
            shutdown: CancellationToken::new(),
            case: CaseState {
                tick: 0,
                status: CaseStatus::Other("UNKNOWN".into()),
            },
            rounds: 0,
            config,
        }
    }

    /// Token that stops the loop at the next round boundary or pause.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn engine(&self) -> &QuoteEngine {
        &self.engine
    }

    /// Last observed case state.
    pub fn case(&self) -> &CaseState {
        &self.case
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Run until the case ends, shutdown is requested or a terminal error.
    pub async fn run(&mut self) -> AppResult<()> {
        info!(
            tickers = ?self.config.strategy.tickers.iter().map(|t| t.ticker.as_str()).collect::<Vec<_>>(),
            end_tick = self.config.end_tick,
            poll_interval_ms = self.config.poll_interval_ms,
            "Starting application"
        );

        let result = self.run_loop().await;

        match &result {
            Err(e) => error!(error = %e, "Round loop stopped"),
            Ok(()) if self.config.cancel_on_shutdown => self.cancel_all_tickers().await,
            Ok(()) => {}
        }

        info!(rounds = self.rounds, tick = self.case.tick, "Shutting down");
        result
    }

    async fn run_loop(&mut self) -> AppResult<()> {
        self.refresh_case().await?;

        while !self.shutdown.is_cancelled() && self.case_running() {
            if self.case.status.is_active() {
                self.run_round().await?;
            } else {
                debug!(tick = self.case.tick, status = %self.case.status, "Case not active, waiting");
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown signal received");
                    break;
                }
                _ = tokio::time::sleep(self.config.poll_interval()) => {}
            }

            self.refresh_case().await?;
        }

        Ok(())
    }

    fn case_running(&self) -> bool {
        self.case.status.is_active() || self.case.tick < self.config.end_tick
    }

    /// Process every configured ticker once, refreshing the case clock
    /// after each.
    pub async fn run_round(&mut self) -> AppResult<()> {
        let tickers = self.config.strategy.tickers.clone();

        for ticker_cfg in &tickers {
            if let Err(e) = self.process_ticker(ticker_cfg).await {
                self.absorb_fault(&ticker_cfg.ticker, e)?;
            }
            self.refresh_case().await?;
        }

        self.rounds += 1;
        Metrics::round_completed();
        Ok(())
    }

    /// Log and count a per-ticker fault, or hand back a terminal one.
    fn absorb_fault(&self, ticker: &Ticker, err: AppError) -> AppResult<()> {
        if err.is_terminal() {
            return Err(err);
        }
        warn!(%ticker, kind = err.kind(), error = %err, "Skipping ticker this round");
        Metrics::ticker_fault(ticker.as_str(), err.kind());
        Ok(())
    }

    /// A failed tick read keeps the previous state unless it is terminal.
    async fn refresh_case(&mut self) -> AppResult<()> {
        match self.gateway.get_tick().await {
            Ok(case) => {
                Metrics::case_tick(case.tick);
                self.case = case;
                Ok(())
            }
            Err(e) => {
                let err = AppError::from(e);
                if err.is_terminal() {
                    return Err(err);
                }
                warn!(kind = err.kind(), error = %err, "Case read failed, keeping last state");
                Ok(())
            }
        }
    }

    async fn process_ticker(&mut self, ticker_cfg: &TickerConfig) -> AppResult<()> {
        let ticker = &ticker_cfg.ticker;
        let position = self.gateway.get_position(ticker).await?;
        Metrics::position(ticker.as_str(), position.net_quantity);

        // A quoting fault still lets the risk check run on the known position.
        if let Err(e) = self.quote(ticker_cfg, &position).await {
            self.absorb_fault(ticker, e)?;
        }

        self.enforce_risk(&position).await
    }

    async fn quote(&mut self, ticker_cfg: &TickerConfig, position: &Position) -> AppResult<()> {
        let ticker = &ticker_cfg.ticker;
        let depth = self.engine.config().depth;

        let raw = self
            .gateway
            .get_book(ticker, self.engine.config().book_request_depth())
            .await?;
        let snapshot = aggregate(&raw);
        let imbalance = imbalance(&snapshot, depth)?;
        self.observe(ticker, &snapshot, &imbalance);

        let decision =
            self.engine
                .decide(ticker_cfg, position.net_quantity, &snapshot, &imbalance)?;
        Metrics::decision(ticker.as_str(), decision.branch());

        let report = self
            .executor
            .execute(&mut self.engine, ticker_cfg, decision)
            .await?;
        debug!(
            %ticker,
            cancelled = report.cancelled,
            placed = report.placed.len(),
            "Decision applied"
        );
        Ok(())
    }

    /// Record book gauges and the fair value. Nothing here blocks quoting.
    fn observe(&self, ticker: &Ticker, snapshot: &OrderBookSnapshot, imbalance: &Imbalance) {
        let name = ticker.as_str();
        if let Some(spread) = snapshot.spread() {
            Metrics::spread(name, to_f64(spread.inner()));
        }
        for (side, vector) in [(BookSide::Bid, &imbalance.bid), (BookSide::Ask, &imbalance.ask)] {
            for (i, ratio) in vector.as_slice().iter().enumerate() {
                Metrics::imbalance(name, side.as_str(), i + 1, to_f64(*ratio));
            }
        }

        match fair_value(snapshot, self.engine.config().fair_value_notional) {
            Ok(fv) => {
                Metrics::fair_value(name, to_f64(fv.mid.inner()));
                debug!(%ticker, bid = %fv.bid, ask = %fv.ask, mid = %fv.mid, "Fair value");
            }
            Err(e) => {
                debug!(%ticker, error = %e, "Fair value unavailable");
                Metrics::fair_value_unavailable(name, e.kind());
            }
        }
    }

    async fn enforce_risk(&mut self, position: &Position) -> AppResult<()> {
        let ticker = &position.ticker;
        let open_orders = self.gateway.count_open_orders(ticker).await?;

        if let RiskAction::CancelAll(breach) = self.governor.evaluate(position, open_orders) {
            self.gateway.cancel_all(ticker).await?;
            self.engine.clear_tracked(ticker);
            Metrics::cancel_all(ticker.as_str(), "risk");
            info!(
                %ticker,
                breached_bands = breach.breached_bands,
                "Cancel-all issued"
            );
        }
        Ok(())
    }

    async fn cancel_all_tickers(&mut self) {
        let tickers: Vec<Ticker> = self
            .config
            .strategy
            .tickers
            .iter()
            .map(|t| t.ticker.clone())
            .collect();

        for ticker in &tickers {
            match self.gateway.cancel_all(ticker).await {
                Ok(()) => {
                    self.engine.clear_tracked(ticker);
                    Metrics::cancel_all(ticker.as_str(), "shutdown");
                    info!(%ticker, "Cancelled resting orders on shutdown");
                }
                Err(e) => warn!(%ticker, error = %e, "Shutdown cancel-all failed"),
            }
        }
    }
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
