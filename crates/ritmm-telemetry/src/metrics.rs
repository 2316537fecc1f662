//! Prometheus metrics for ritmm.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. A registration failure means a
//! duplicate metric name, which is a programming error caught on first use.

use crate::error::TelemetryResult;
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_int_counter, register_int_gauge,
    CounterVec, Encoder, GaugeVec, IntCounter, IntGauge, TextEncoder,
};

/// Completed quoting rounds.
pub static ROUNDS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("ritmm_rounds_total", "Completed quoting rounds").unwrap()
});

/// Case tick observed by the loop.
pub static CASE_TICK: Lazy<IntGauge> =
    Lazy::new(|| register_int_gauge!("ritmm_case_tick", "Current case tick").unwrap());

/// Orders placed.
/// Labels: ticker, side, reason (tight/ladder/secondary)
pub static ORDERS_PLACED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ritmm_orders_placed_total",
        "Orders placed",
        &["ticker", "side", "reason"]
    )
    .unwrap()
});

/// Individual order cancels issued.
pub static ORDERS_CANCELLED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ritmm_orders_cancelled_total",
        "Individual order cancels issued",
        &["ticker"]
    )
    .unwrap()
});

/// Cancel-all commands issued by the risk governor or on shutdown.
pub static CANCEL_ALL_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ritmm_cancel_all_total",
        "Cancel-all commands issued",
        &["ticker", "trigger"]
    )
    .unwrap()
});

/// Per-ticker faults that skipped work for a round.
/// Labels: ticker, kind (malformed_book/transport/rejected/...)
pub static TICKER_FAULTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ritmm_ticker_faults_total",
        "Per-ticker faults",
        &["ticker", "kind"]
    )
    .unwrap()
});

/// Rounds where the fair value could not be computed. Quoting continues.
pub static FAIR_VALUE_UNAVAILABLE_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ritmm_fair_value_unavailable_total",
        "Rounds without a fair value",
        &["ticker", "kind"]
    )
    .unwrap()
});

/// Branch taken per decision.
pub static DECISIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ritmm_decisions_total",
        "Quote decisions by branch",
        &["ticker", "branch"]
    )
    .unwrap()
});

/// Net position in shares.
pub static POSITION: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!("ritmm_position", "Net position in shares", &["ticker"]).unwrap()
});

/// Inside spread.
pub static SPREAD: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!("ritmm_spread", "Inside spread", &["ticker"]).unwrap()
});

/// Fill-weighted fair value.
pub static FAIR_VALUE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!("ritmm_fair_value", "Fill-weighted fair value", &["ticker"]).unwrap()
});

/// Cumulative depth imbalance.
/// Labels: ticker, side (bid/ask), level (1-based)
pub static IMBALANCE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "ritmm_imbalance",
        "Cumulative depth imbalance",
        &["ticker", "side", "level"]
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    pub fn round_completed() {
        ROUNDS_TOTAL.inc();
    }

    pub fn case_tick(tick: u32) {
        CASE_TICK.set(i64::from(tick));
    }

    pub fn order_placed(ticker: &str, side: &str, reason: &str) {
        ORDERS_PLACED_TOTAL
            .with_label_values(&[ticker, side, reason])
            .inc();
    }

    pub fn order_cancelled(ticker: &str) {
        ORDERS_CANCELLED_TOTAL.with_label_values(&[ticker]).inc();
    }

    /// `trigger` is `risk` or `shutdown`.
    pub fn cancel_all(ticker: &str, trigger: &str) {
        CANCEL_ALL_TOTAL.with_label_values(&[ticker, trigger]).inc();
    }

    pub fn ticker_fault(ticker: &str, kind: &str) {
        TICKER_FAULTS_TOTAL.with_label_values(&[ticker, kind]).inc();
    }

    pub fn fair_value_unavailable(ticker: &str, kind: &str) {
        FAIR_VALUE_UNAVAILABLE_TOTAL
            .with_label_values(&[ticker, kind])
            .inc();
    }

    pub fn decision(ticker: &str, branch: &str) {
        DECISIONS_TOTAL.with_label_values(&[ticker, branch]).inc();
    }

    pub fn position(ticker: &str, net_quantity: i64) {
        POSITION.with_label_values(&[ticker]).set(net_quantity as f64);
    }

    pub fn spread(ticker: &str, spread: f64) {
        SPREAD.with_label_values(&[ticker]).set(spread);
    }

    pub fn fair_value(ticker: &str, value: f64) {
        FAIR_VALUE.with_label_values(&[ticker]).set(value);
    }

    pub fn imbalance(ticker: &str, side: &str, level: usize, ratio: f64) {
        IMBALANCE
            .with_label_values(&[ticker, side, &level.to_string()])
            .set(ratio);
    }

    /// Render the default registry in the Prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&prometheus::gather(), &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}
