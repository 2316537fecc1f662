//! Shared fixtures for integration tests.

#![allow(dead_code)]

pub mod fake_gateway;

use ritmm_bot::AppConfig;
use ritmm_core::{DepthLevel, Price, RawBook, Size};
use ritmm_mm::TickerConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Default config quoting `tickers`, with a short poll interval.
pub fn app_config(tickers: Vec<TickerConfig>) -> AppConfig {
    let mut config = AppConfig::default();
    config.gateway.api_key = "TEST".into();
    config.poll_interval_ms = 10;
    config.strategy.tickers = tickers;
    config
}

pub fn owl() -> TickerConfig {
    TickerConfig::new("OWL", dec!(500), dec!(0.02))
}

pub fn duck() -> TickerConfig {
    TickerConfig::new("DUCK", dec!(1000), dec!(0.10))
}

pub fn book(bids: &[(Decimal, u32)], asks: &[(Decimal, u32)]) -> RawBook {
    let side = |levels: &[(Decimal, u32)]| {
        levels
            .iter()
            .map(|&(p, q)| DepthLevel::new(Price::new(p), Size::from(q)))
            .collect()
    };
    RawBook {
        bids: side(bids),
        asks: side(asks),
    }
}

/// Three-level book around 100.00 with a four-tick inside spread.
pub fn tight_book() -> RawBook {
    book(
        &[(dec!(99.98), 1000), (dec!(99.97), 1000), (dec!(99.96), 1000)],
        &[(dec!(100.02), 1000), (dec!(100.03), 1000), (dec!(100.04), 1000)],
    )
}
