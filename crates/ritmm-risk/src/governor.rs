//! Position / open-order trip wire.
//!
//! Each band pairs a safe position value with a resting order count. A
//! band is breached when `|P| > safe_value` and `open_orders > max_open_orders`.
//! Any number of breached bands collapse into one `CancelAll`.

use crate::error::{RiskError, RiskResult};
use ritmm_core::Position;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One safe-value band, expressed relative to the position limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskBand {
    /// Safe value as a fraction of the position limit.
    pub safe_value_ratio: Decimal,
    /// Resting orders tolerated above the safe value.
    pub max_open_orders: usize,
}

/// Risk configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    #[serde(default = "default_bands")]
    pub bands: Vec<RiskBand>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            bands: default_bands(),
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> RiskResult<()> {
        for band in &self.bands {
            if band.safe_value_ratio < Decimal::ZERO {
                return Err(RiskError::ConfigError(format!(
                    "safe_value_ratio must not be negative: {}",
                    band.safe_value_ratio
                )));
            }
        }
        Ok(())
    }
}

fn default_bands() -> Vec<RiskBand> {
    vec![
        RiskBand {
            safe_value_ratio: Decimal::new(2, 1), // 0.2
            max_open_orders: 8,
        },
        RiskBand {
            safe_value_ratio: Decimal::new(2, 1),
            max_open_orders: 16,
        },
    ]
}

/// The band that tripped first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskBreach {
    pub safe_value: Decimal,
    pub max_open_orders: usize,
    pub position: i64,
    pub open_orders: usize,
    /// Number of bands breached this evaluation.
    pub breached_bands: usize,
}

/// Governor verdict for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskAction {
    None,
    CancelAll(RiskBreach),
}

impl RiskAction {
    pub fn is_cancel_all(&self) -> bool {
        matches!(self, Self::CancelAll(_))
    }
}

#[derive(Debug, Clone, Copy)]
struct ResolvedBand {
    safe_value: Decimal,
    max_open_orders: usize,
}

/// Cancel-all trip wire.
#[derive(Debug, Clone)]
pub struct RiskGovernor {
    bands: Vec<ResolvedBand>,
}

impl RiskGovernor {
    /// Resolve band ratios against `position_limit`.
    pub fn new(config: &RiskConfig, position_limit: Decimal) -> Self {
        let bands = config
            .bands
            .iter()
            .map(|b| ResolvedBand {
                safe_value: b.safe_value_ratio * position_limit,
                max_open_orders: b.max_open_orders,
            })
            .collect();
        Self { bands }
    }

    /// Evaluate one ticker.
    pub fn evaluate(&self, position: &Position, open_orders: usize) -> RiskAction {
        let abs = Decimal::from(position.abs_quantity());
        let mut breached = self
            .bands
            .iter()
            .filter(|b| abs > b.safe_value && open_orders > b.max_open_orders);

        let Some(first) = breached.next() else {
            return RiskAction::None;
        };
        let breach = RiskBreach {
            safe_value: first.safe_value,
            max_open_orders: first.max_open_orders,
            position: position.net_quantity,
            open_orders,
            breached_bands: 1 + breached.count(),
        };

        warn!(
            ticker = %position.ticker,
            position = position.net_quantity,
            open_orders,
            safe_value = %breach.safe_value,
            max_open_orders = breach.max_open_orders,
            breached_bands = breach.breached_bands,
            "Risk band breached, cancelling all orders"
        );

        RiskAction::CancelAll(breach)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ritmm_core::Ticker;
    use rust_decimal_macros::dec;

    fn governor() -> RiskGovernor {
        RiskGovernor::new(&RiskConfig::default(), dec!(10000))
    }

    fn pos(qty: i64) -> Position {
        Position {
            ticker: Ticker::new("OWL"),
            net_quantity: qty,
            average_cost: dec!(25),
        }
    }

    #[test]
    fn test_within_safe_value_never_trips() {
        let g = governor();
        assert_eq!(g.evaluate(&pos(2000), 100), RiskAction::None);
        assert_eq!(g.evaluate(&pos(-2000), 100), RiskAction::None);
    }

    #[test]
    fn test_few_orders_never_trip() {
        let g = governor();
        assert_eq!(g.evaluate(&pos(9000), 8), RiskAction::None);
    }

    #[test]
    fn test_first_band_trips() {
        let g = governor();
        match g.evaluate(&pos(-2001), 9) {
            RiskAction::CancelAll(breach) => {
                assert_eq!(breach.max_open_orders, 8);
                assert_eq!(breach.breached_bands, 1);
                assert_eq!(breach.position, -2001);
            }
            RiskAction::None => panic!("Expected CancelAll"),
        }
    }

    #[test]
    fn test_both_bands_collapse_to_one_action() {
        let g = governor();
        let action = g.evaluate(&pos(5000), 17);

        match action {
            RiskAction::CancelAll(breach) => {
                assert_eq!(breach.breached_bands, 2);
                assert_eq!(breach.max_open_orders, 8);
            }
            RiskAction::None => panic!("Expected CancelAll"),
        }
    }

    #[test]
    fn test_no_bands_never_trips() {
        let g = RiskGovernor::new(&RiskConfig { bands: vec![] }, dec!(10000));
        assert!(!g.evaluate(&pos(10000), 1000).is_cancel_all());
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[[bands]]
safe_value_ratio = 0.5
max_open_orders = 4
"#;
        let config: RiskConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());
        let g = RiskGovernor::new(&config, dec!(10000));
        assert!(!g.evaluate(&pos(5000), 5).is_cancel_all());
        assert!(g.evaluate(&pos(5001), 5).is_cancel_all());
    }

    #[test]
    fn test_negative_ratio_rejected() {
        let config = RiskConfig {
            bands: vec![RiskBand {
                safe_value_ratio: dec!(-0.1),
                max_open_orders: 1,
            }],
        };
        assert!(config.validate().is_err());
    }
}
