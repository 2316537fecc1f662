//! Orders as the exchange sees them.
//!
//! The exchange speaks upper-case actions (`BUY`/`SELL`) and order types
//! (`LIMIT`/`MARKET`); the serde representations follow that.

use crate::decimal::{Price, Size};
use crate::error::CoreError;
use crate::types::Ticker;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which way an order trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Wire value of the `action` query parameter.
    pub fn as_action(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

/// Lower-case, for log fields and metric labels.
impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        })
    }
}

impl FromStr for OrderSide {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            _ => Err(CoreError::UnknownAction(s.to_string())),
        }
    }
}

/// `LIMIT` or `MARKET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    /// Resting limit order. The only type the quoting engine emits.
    #[default]
    Limit,
    Market,
}

impl OrderType {
    /// Wire value of the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Exchange-assigned order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A new order to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub ticker: Ticker,
    pub order_type: OrderType,
    pub quantity: Size,
    pub price: Price,
    pub side: OrderSide,
}

impl OrderRequest {
    /// Limit order at `price` for `quantity`.
    pub fn limit(ticker: Ticker, side: OrderSide, quantity: Size, price: Price) -> Self {
        Self {
            ticker,
            order_type: OrderType::Limit,
            quantity,
            price,
            side,
        }
    }
}

/// An order resting on the exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenOrder {
    pub order_id: OrderId,
    pub ticker: Ticker,
    #[serde(rename = "action")]
    pub side: OrderSide,
    pub quantity: Size,
    /// Absent for market orders.
    #[serde(default)]
    pub price: Option<Price>,
}
