//! Cumulative depth imbalance.
//!
//! For level `i` (1-based) the bid imbalance is
//! `sum(bid sizes through i) / sum(ask sizes through i)` and the ask
//! imbalance is its reciprocal.

use crate::aggregator::OrderBookSnapshot;
use crate::error::{BookError, BookResult};
use ritmm_core::{BookSide, Size};
use rust_decimal::Decimal;

/// Imbalance ratios for levels `1..=depth` of one side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImbalanceVector(Vec<Decimal>);

impl ImbalanceVector {
    /// Ratio through `level` (1-based).
    pub fn level(&self, level: usize) -> Option<Decimal> {
        level.checked_sub(1).and_then(|i| self.0.get(i)).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Decimal] {
        &self.0
    }
}

/// Bid and ask imbalance vectors for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Imbalance {
    pub bid: ImbalanceVector,
    pub ask: ImbalanceVector,
}

/// Compute imbalance through the first `depth` levels, or through every
/// level when the snapshot is shallower.
///
/// The vectors may come back shorter than `depth`; callers that read a
/// level check it exists. Fails with `ZeroCumulativeSize` when either
/// running sum is zero.
pub fn imbalance(snapshot: &OrderBookSnapshot, depth: usize) -> BookResult<Imbalance> {
    let depth = depth.min(snapshot.depth());
    let mut bid = Vec::with_capacity(depth);
    let mut ask = Vec::with_capacity(depth);
    let mut bid_cum = Size::ZERO;
    let mut ask_cum = Size::ZERO;

    for (i, (b, a)) in snapshot
        .bids()
        .iter()
        .zip(snapshot.asks())
        .take(depth)
        .enumerate()
    {
        bid_cum += b.size;
        ask_cum += a.size;
        let level = i + 1;
        if bid_cum.is_zero() {
            return Err(BookError::ZeroCumulativeSize {
                side: BookSide::Bid,
                level,
            });
        }
        if ask_cum.is_zero() {
            return Err(BookError::ZeroCumulativeSize {
                side: BookSide::Ask,
                level,
            });
        }
        bid.push(bid_cum.inner() / ask_cum.inner());
        ask.push(ask_cum.inner() / bid_cum.inner());
    }

    Ok(Imbalance {
        bid: ImbalanceVector(bid),
        ask: ImbalanceVector(ask),
    })
}
