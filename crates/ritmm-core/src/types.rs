//! Market data and account state types.

use crate::decimal::{Price, Size};
use crate::error::{CoreError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Security ticker symbol (e.g. `OWL`).
///
/// Deserialized through [`Ticker::parse`], so blank symbols are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Parse a user-supplied symbol, rejecting blanks.
    pub fn parse(symbol: &str) -> Result<Self> {
        let trimmed = symbol.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidTicker(symbol.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Ticker {
    type Error = CoreError;

    fn try_from(symbol: String) -> Result<Self> {
        Self::parse(&symbol)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Book side, used for labelling faults and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookSide {
    Bid,
    Ask,
}

impl BookSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bid => "bid",
            Self::Ask => "ask",
        }
    }
}

impl fmt::Display for BookSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single (price, size) entry on one side of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthLevel {
    pub price: Price,
    #[serde(rename = "quantity")]
    pub size: Size,
}

impl DepthLevel {
    pub fn new(price: Price, size: Size) -> Self {
        Self { price, size }
    }
}

/// Book depth exactly as the exchange returns it.
///
/// Entries are best-price first and may repeat a price when several
/// resting orders sit at the same level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBook {
    #[serde(default)]
    pub bids: Vec<DepthLevel>,
    #[serde(default)]
    pub asks: Vec<DepthLevel>,
}

/// Net position for one ticker, read fresh every round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub ticker: Ticker,
    /// Signed share count; positive is long.
    pub net_quantity: i64,
    pub average_cost: Decimal,
}

impl Position {
    pub fn flat(ticker: Ticker) -> Self {
        Self {
            ticker,
            net_quantity: 0,
            average_cost: Decimal::ZERO,
        }
    }

    pub fn abs_quantity(&self) -> i64 {
        self.net_quantity.abs()
    }

    pub fn is_flat(&self) -> bool {
        self.net_quantity == 0
    }
}

/// Case lifecycle status reported by the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseStatus {
    Active,
    Paused,
    Stopped,
    Other(String),
}

impl CaseStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<&str> for CaseStatus {
    fn from(s: &str) -> Self {
        match s {
            "ACTIVE" => Self::Active,
            "PAUSED" => Self::Paused,
            "STOPPED" => Self::Stopped,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Paused => write!(f, "PAUSED"),
            Self::Stopped => write!(f, "STOPPED"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Simulator clock: current tick and case status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseState {
    pub tick: u32,
    pub status: CaseStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ticker_parse_trims() {
        assert_eq!(Ticker::parse(" OWL ").unwrap(), Ticker::new("OWL"));
        assert!(Ticker::parse("   ").is_err());
    }

    #[test]
    fn test_ticker_deserialize_rejects_blank() {
        let ticker: Ticker = serde_json::from_str("\" OWL\"").unwrap();
        assert_eq!(ticker, Ticker::new("OWL"));
        assert_eq!(serde_json::to_string(&ticker).unwrap(), "\"OWL\"");
        assert!(serde_json::from_str::<Ticker>("\"  \"").is_err());
    }

    #[test]
    fn test_case_status_from_str() {
        assert!(CaseStatus::from("ACTIVE").is_active());
        assert_eq!(CaseStatus::from("STOPPED"), CaseStatus::Stopped);
        assert_eq!(
            CaseStatus::from("ARCHIVED"),
            CaseStatus::Other("ARCHIVED".to_string())
        );
        assert!(!CaseStatus::from("PAUSED").is_active());
    }

    #[test]
    fn test_raw_book_deserialize() {
        let json = r#"{
            "bids": [{"price": 10.00, "quantity": 100}, {"price": 9.99, "quantity": 200}],
            "asks": [{"price": 10.02, "quantity": 300}]
        }"#;
        let book: RawBook = serde_json::from_str(json).unwrap();
        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.bids[1].price, Price::new(dec!(9.99)));
        assert_eq!(book.asks[0].size, Size::new(dec!(300)));
    }

    #[test]
    fn test_position_flat() {
        let pos = Position::flat(Ticker::new("DUCK"));
        assert!(pos.is_flat());
        assert_eq!(pos.abs_quantity(), 0);
    }
}
