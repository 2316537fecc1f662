//! Fill-weighted fair value.
//!
//! Simulates filling a fixed target notional `Q` against each side of the
//! book. Level notionals (`price * size`) are taken in full until the next
//! one would pass `Q`; that last level only contributes the remainder.
//! The side price is the notional-weighted average of the touched level
//! prices, and the fair value is the mean of the two side prices.

use crate::aggregator::OrderBookSnapshot;
use crate::error::{BookError, BookResult};
use ritmm_core::{BookSide, DepthLevel, Price};
use rust_decimal::Decimal;

/// Per-side fill prices and their midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FairValue {
    pub bid: Price,
    pub ask: Price,
    pub mid: Price,
}

/// Compute the fill-weighted fair value for `target` notional.
pub fn fair_value(snapshot: &OrderBookSnapshot, target: Decimal) -> BookResult<FairValue> {
    if target <= Decimal::ZERO {
        return Err(BookError::InvalidTarget(target));
    }
    let bid = side_fill_price(snapshot.bids(), target, BookSide::Bid)?;
    let ask = side_fill_price(snapshot.asks(), target, BookSide::Ask)?;
    let mid = Price::new((bid.inner() + ask.inner()) / Decimal::TWO);

    Ok(FairValue { bid, ask, mid })
}

fn side_fill_price(levels: &[DepthLevel], target: Decimal, side: BookSide) -> BookResult<Price> {
    let mut filled = Decimal::ZERO;
    let mut weighted = Decimal::ZERO;

    for level in levels {
        let notional = level.size.notional(level.price);
        let take = notional.min(target - filled);
        weighted += take * level.price.inner();
        filled += take;
        if filled >= target {
            return Ok(Price::new(weighted / target));
        }
    }

    Err(BookError::InsufficientDepth {
        side,
        available: filled,
        target,
    })
}
