//! Market making configuration.

use crate::error::{MakerError, MakerResult};
use ritmm_core::{Price, Size, Ticker};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Per-ticker quoting parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerConfig {
    pub ticker: Ticker,

    /// Size of every order placed for this ticker.
    pub order_size: Size,

    /// Spread at or above which the tight branch may quote.
    pub min_spread: Price,
}

impl TickerConfig {
    pub fn new(ticker: impl Into<String>, order_size: Decimal, min_spread: Decimal) -> Self {
        Self {
            ticker: Ticker::new(ticker),
            order_size: Size::new(order_size),
            min_spread: Price::new(min_spread),
        }
    }
}

/// Market making configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MakerConfig {
    /// Tickers to quote, processed in this order every round.
    #[serde(default = "default_tickers")]
    pub tickers: Vec<TickerConfig>,

    /// Imbalance depth D.
    #[serde(default = "default_depth")]
    pub depth: usize,

    /// Raw book entries requested per side, as a multiple of `depth`.
    #[serde(default = "default_book_depth_multiplier")]
    pub book_depth_multiplier: usize,

    /// Position limit L in shares; all inventory thresholds scale with it.
    #[serde(default = "default_position_limit")]
    pub position_limit: Decimal,

    /// Tight branch requires `|P| < ratio * L`.
    #[serde(default = "default_tight_inventory_ratio")]
    pub tight_inventory_ratio: Decimal,

    /// Buy ladder requires `P < ratio * L`; sell ladder `P > -ratio * L`.
    #[serde(default = "default_ladder_inventory_ratio")]
    pub ladder_inventory_ratio: Decimal,

    /// Secondary sell requires `P > ratio * L`; secondary buy `P < -ratio * L`.
    #[serde(default = "default_secondary_inventory_ratio")]
    pub secondary_inventory_ratio: Decimal,

    /// Imbalance pivot K.
    #[serde(default = "default_imbalance_pivot")]
    pub imbalance_pivot: Decimal,

    /// Price nudge per unit of `P / L`.
    #[serde(default = "default_skew_coefficient")]
    pub skew_coefficient: Decimal,

    /// Minimum price increment.
    #[serde(default = "default_tick_size")]
    pub tick_size: Price,

    /// Target notional Q for the fair value fill simulation.
    #[serde(default = "default_fair_value_notional")]
    pub fair_value_notional: Decimal,
}

impl Default for MakerConfig {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
            depth: default_depth(),
            book_depth_multiplier: default_book_depth_multiplier(),
            position_limit: default_position_limit(),
            tight_inventory_ratio: default_tight_inventory_ratio(),
            ladder_inventory_ratio: default_ladder_inventory_ratio(),
            secondary_inventory_ratio: default_secondary_inventory_ratio(),
            imbalance_pivot: default_imbalance_pivot(),
            skew_coefficient: default_skew_coefficient(),
            tick_size: default_tick_size(),
            fair_value_notional: default_fair_value_notional(),
        }
    }
}

impl MakerConfig {
    /// Raw entries to request per side from the book endpoint.
    pub fn book_request_depth(&self) -> usize {
        self.depth * self.book_depth_multiplier
    }

    pub fn ticker(&self, ticker: &Ticker) -> Option<&TickerConfig> {
        self.tickers.iter().find(|t| &t.ticker == ticker)
    }

    /// Absolute inventory thresholds derived from the position limit.
    pub fn thresholds(&self) -> InventoryThresholds {
        let l = self.position_limit;
        InventoryThresholds {
            tight_abs: self.tight_inventory_ratio * l,
            buy_ladder: self.ladder_inventory_ratio * l,
            sell_secondary: self.secondary_inventory_ratio * l,
            sell_ladder: -self.ladder_inventory_ratio * l,
            buy_secondary: -self.secondary_inventory_ratio * l,
        }
    }

    pub fn validate(&self) -> MakerResult<()> {
        if self.tickers.is_empty() {
            return Err(MakerError::InvalidConfig("no tickers configured".into()));
        }
        for t in &self.tickers {
            if !t.order_size.is_positive() {
                return Err(MakerError::InvalidConfig(format!(
                    "{}: order_size must be positive",
                    t.ticker
                )));
            }
            if t.min_spread.inner() < Decimal::ZERO {
                return Err(MakerError::InvalidConfig(format!(
                    "{}: min_spread must not be negative",
                    t.ticker
                )));
            }
        }
        if self.depth == 0 {
            return Err(MakerError::InvalidConfig("depth must be at least 1".into()));
        }
        if self.book_depth_multiplier == 0 {
            return Err(MakerError::InvalidConfig(
                "book_depth_multiplier must be at least 1".into(),
            ));
        }
        if self.position_limit <= Decimal::ZERO {
            return Err(MakerError::InvalidConfig(
                "position_limit must be positive".into(),
            ));
        }
        if !self.tick_size.is_positive() {
            return Err(MakerError::InvalidConfig("tick_size must be positive".into()));
        }
        if self.fair_value_notional <= Decimal::ZERO {
            return Err(MakerError::InvalidConfig(
                "fair_value_notional must be positive".into(),
            ));
        }
        if self.skew_coefficient < Decimal::ZERO {
            return Err(MakerError::InvalidConfig(
                "skew_coefficient must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Signed position thresholds in shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryThresholds {
    /// Bound on `|P|` for the tight branch.
    pub tight_abs: Decimal,
    /// Buy ladder fires below this.
    pub buy_ladder: Decimal,
    /// Secondary sell fires above this.
    pub sell_secondary: Decimal,
    /// Sell ladder fires above this.
    pub sell_ladder: Decimal,
    /// Secondary buy fires below this.
    pub buy_secondary: Decimal,
}

fn default_tickers() -> Vec<TickerConfig> {
    vec![
        TickerConfig::new("OWL", dec!(500), dec!(0.02)),
        TickerConfig::new("DUCK", dec!(1000), dec!(0.10)),
    ]
}
fn default_depth() -> usize {
    3
}
fn default_book_depth_multiplier() -> usize {
    3
}
fn default_position_limit() -> Decimal {
    Decimal::new(10_000, 0)
}
fn default_tight_inventory_ratio() -> Decimal {
    Decimal::new(6, 1) // 0.6
}
fn default_ladder_inventory_ratio() -> Decimal {
    Decimal::new(4, 1) // 0.4
}
fn default_secondary_inventory_ratio() -> Decimal {
    Decimal::new(2, 1) // 0.2
}
fn default_imbalance_pivot() -> Decimal {
    Decimal::ONE
}
fn default_skew_coefficient() -> Decimal {
    Decimal::new(2, 2) // 0.02
}
fn default_tick_size() -> Price {
    Price::new(Decimal::new(1, 2)) // 0.01
}
fn default_fair_value_notional() -> Decimal {
    Decimal::new(2_500_000, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MakerConfig::default();
        assert_eq!(config.tickers.len(), 2);
        assert_eq!(config.tickers[0].ticker, Ticker::new("OWL"));
        assert_eq!(config.tickers[1].order_size, Size::new(dec!(1000)));
        assert_eq!(config.depth, 3);
        assert_eq!(config.book_request_depth(), 9);
        assert_eq!(config.position_limit, dec!(10000));
        assert_eq!(config.imbalance_pivot, dec!(1));
        assert_eq!(config.skew_coefficient, dec!(0.02));
        assert_eq!(config.tick_size, Price::new(dec!(0.01)));
        assert_eq!(config.fair_value_notional, dec!(2500000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_thresholds_from_limit() {
        let t = MakerConfig::default().thresholds();
        assert_eq!(t.tight_abs, dec!(6000));
        assert_eq!(t.buy_ladder, dec!(4000));
        assert_eq!(t.sell_secondary, dec!(2000));
        assert_eq!(t.sell_ladder, dec!(-4000));
        assert_eq!(t.buy_secondary, dec!(-2000));
    }

    #[test]
    fn test_config_serde_defaults() {
        let toml_str = r#"
position_limit = 20000

[[tickers]]
ticker = "CROW"
order_size = 250
min_spread = 0.05
"#;
        let config: MakerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.tickers.len(), 1);
        assert_eq!(config.tickers[0].min_spread, Price::new(dec!(0.05)));
        assert_eq!(config.position_limit, dec!(20000));
        assert_eq!(config.depth, 3);
        assert_eq!(config.thresholds().tight_abs, dec!(12000));
        assert!(config.ticker(&Ticker::new("CROW")).is_some());
        assert!(config.ticker(&Ticker::new("OWL")).is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = MakerConfig::default();
        config.depth = 0;
        assert!(config.validate().is_err());

        let mut config = MakerConfig::default();
        config.tickers.clear();
        assert!(config.validate().is_err());

        let mut config = MakerConfig::default();
        config.tickers[0].order_size = Size::ZERO;
        assert!(config.validate().is_err());

        let config = MakerConfig {
            tick_size: Price::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_ticker_rejected_at_parse() {
        let toml_str = r#"
[[tickers]]
ticker = "  "
order_size = 250
min_spread = 0.05
"#;
        let err = toml::from_str::<MakerConfig>(toml_str).unwrap_err();
        assert!(err.to_string().contains("Invalid ticker"));

        let padded = toml_str.replace("\"  \"", "\" CROW \"");
        let padded: MakerConfig = toml::from_str(&padded).unwrap();
        assert_eq!(padded.tickers[0].ticker, Ticker::new("CROW"));
    }
}
