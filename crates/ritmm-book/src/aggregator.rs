//! Raw ladder aggregation.
//!
//! The exchange returns one entry per resting order, so several
//! consecutive entries can share a price. Aggregation merges them into one
//! level per price and cuts both sides to a common length.
//!
//! Both sides are walked with a single shared index bounded by the shorter
//! raw side. Heavy duplication on one side therefore shortens the usable
//! depth of the other side as well.

use crate::error::{BookError, BookResult};
use ritmm_core::{DepthLevel, Price, RawBook};
use tracing::trace;

/// Aggregated two-sided book for one round.
///
/// Bids are strictly descending, asks strictly ascending, and both sides
/// always have the same number of levels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderBookSnapshot {
    bids: Vec<DepthLevel>,
    asks: Vec<DepthLevel>,
}

impl OrderBookSnapshot {
    pub fn bids(&self) -> &[DepthLevel] {
        &self.bids
    }

    pub fn asks(&self) -> &[DepthLevel] {
        &self.asks
    }

    /// Number of levels on each side.
    pub fn depth(&self) -> usize {
        self.bids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty()
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first().map(|l| l.price)
    }

    /// `best_ask - best_bid`, exact.
    pub fn spread(&self) -> Option<Price> {
        Some(self.best_ask()? - self.best_bid()?)
    }

    /// Fail with `MalformedBook` unless at least `levels` levels exist.
    pub fn require_depth(&self, levels: usize) -> BookResult<()> {
        if self.depth() < levels {
            return Err(BookError::MalformedBook {
                required: levels,
                available: self.depth(),
            });
        }
        Ok(())
    }
}

/// Aggregate a raw book into unique price levels.
pub fn aggregate(raw: &RawBook) -> OrderBookSnapshot {
    let walk = raw.bids.len().min(raw.asks.len());
    let mut bids = Vec::with_capacity(walk);
    let mut asks = Vec::with_capacity(walk);
    let mut running_bid: Option<Price> = None;
    let mut running_ask: Option<Price> = None;

    for i in 0..walk {
        merge_entry(&mut bids, &mut running_bid, raw.bids[i]);
        merge_entry(&mut asks, &mut running_ask, raw.asks[i]);
    }

    let common = bids.len().min(asks.len());
    bids.truncate(common);
    asks.truncate(common);

    trace!(
        raw_bids = raw.bids.len(),
        raw_asks = raw.asks.len(),
        levels = common,
        "Aggregated book"
    );

    OrderBookSnapshot { bids, asks }
}

fn merge_entry(levels: &mut Vec<DepthLevel>, running: &mut Option<Price>, entry: DepthLevel) {
    if *running == Some(entry.price) {
        if let Some(last) = levels.last_mut() {
            last.size += entry.size;
            return;
        }
    }
    levels.push(entry);
    *running = Some(entry.price);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ritmm_core::Size;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn lvl(price: Decimal, size: Decimal) -> DepthLevel {
        DepthLevel::new(Price::new(price), Size::new(size))
    }

    fn raw(bids: Vec<DepthLevel>, asks: Vec<DepthLevel>) -> RawBook {
        RawBook { bids, asks }
    }

    fn totals(levels: &[DepthLevel]) -> BTreeMap<Price, Size> {
        let mut out = BTreeMap::new();
        for l in levels {
            *out.entry(l.price).or_insert(Size::ZERO) += l.size;
        }
        out
    }

    #[test]
    fn test_merges_duplicate_bid_prices() {
        let book = raw(
            vec![
                lvl(dec!(10.00), dec!(100)),
                lvl(dec!(10.00), dec!(50)),
                lvl(dec!(9.99), dec!(200)),
            ],
            vec![
                lvl(dec!(10.01), dec!(10)),
                lvl(dec!(10.02), dec!(20)),
                lvl(dec!(10.03), dec!(30)),
            ],
        );

        let snap = aggregate(&book);

        assert_eq!(
            snap.bids(),
            &[lvl(dec!(10.00), dec!(150)), lvl(dec!(9.99), dec!(200))]
        );
        // Ask side is cut to the bid side's length.
        assert_eq!(
            snap.asks(),
            &[lvl(dec!(10.01), dec!(10)), lvl(dec!(10.02), dec!(20))]
        );
    }

    #[test]
    fn test_empty_side_yields_empty_snapshot() {
        let book = raw(vec![lvl(dec!(10.00), dec!(100))], vec![]);
        let snap = aggregate(&book);

        assert!(snap.is_empty());
        assert!(snap.asks().is_empty());
        assert_eq!(snap.best_bid(), None);
        assert_eq!(snap.spread(), None);
    }

    #[test]
    fn test_walk_bounded_by_shorter_raw_side() {
        // Ask side has only two raw entries, so the third bid is never read.
        let book = raw(
            vec![
                lvl(dec!(10.00), dec!(1)),
                lvl(dec!(9.99), dec!(2)),
                lvl(dec!(9.98), dec!(3)),
            ],
            vec![lvl(dec!(10.01), dec!(4)), lvl(dec!(10.02), dec!(5))],
        );

        let snap = aggregate(&book);

        assert_eq!(snap.depth(), 2);
        assert_eq!(snap.bids()[1], lvl(dec!(9.99), dec!(2)));
    }

    #[test]
    fn test_aggregation_preserves_size_per_price_within_window() {
        let bids = vec![
            lvl(dec!(20.10), dec!(100)),
            lvl(dec!(20.10), dec!(300)),
            lvl(dec!(20.09), dec!(200)),
            lvl(dec!(20.08), dec!(50)),
            lvl(dec!(20.08), dec!(25)),
            lvl(dec!(20.07), dec!(10)),
        ];
        let asks = vec![
            lvl(dec!(20.12), dec!(70)),
            lvl(dec!(20.13), dec!(80)),
            lvl(dec!(20.14), dec!(90)),
            lvl(dec!(20.14), dec!(10)),
            lvl(dec!(20.15), dec!(60)),
            lvl(dec!(20.16), dec!(40)),
        ];
        let snap = aggregate(&raw(bids.clone(), asks.clone()));

        assert!(snap.depth() <= bids.len());
        let raw_bid_totals = totals(&bids);
        for level in snap.bids() {
            assert_eq!(level.size, raw_bid_totals[&level.price]);
        }
        let raw_ask_totals = totals(&asks);
        for level in snap.asks() {
            assert_eq!(level.size, raw_ask_totals[&level.price]);
        }
    }

    #[test]
    fn test_prices_strictly_monotonic() {
        let snap = aggregate(&raw(
            vec![
                lvl(dec!(5.05), dec!(1)),
                lvl(dec!(5.05), dec!(1)),
                lvl(dec!(5.04), dec!(1)),
                lvl(dec!(5.03), dec!(1)),
            ],
            vec![
                lvl(dec!(5.07), dec!(1)),
                lvl(dec!(5.08), dec!(1)),
                lvl(dec!(5.08), dec!(1)),
                lvl(dec!(5.09), dec!(1)),
            ],
        ));

        assert!(snap.bids().windows(2).all(|w| w[0].price > w[1].price));
        assert!(snap.asks().windows(2).all(|w| w[0].price < w[1].price));
        assert_eq!(snap.bids().len(), snap.asks().len());
    }

    #[test]
    fn test_require_depth() {
        let snap = aggregate(&raw(
            vec![lvl(dec!(10.00), dec!(1))],
            vec![lvl(dec!(10.01), dec!(1))],
        ));

        assert!(snap.require_depth(1).is_ok());
        assert_eq!(
            snap.require_depth(3),
            Err(BookError::MalformedBook {
                required: 3,
                available: 1
            })
        );
    }

    #[test]
    fn test_spread_is_exact() {
        let snap = aggregate(&raw(
            vec![lvl(dec!(99.98), dec!(1))],
            vec![lvl(dec!(100.02), dec!(1))],
        ));

        assert_eq!(snap.spread(), Some(Price::new(dec!(0.04))));
    }
}
