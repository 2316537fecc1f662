//! Per-ticker quoting decision engine.
//!
//! Each round the engine picks one of two branches:
//!
//! - **Tight**: spread at or above the ticker's `min_spread` and `|P|`
//!   under the tight threshold. Previously tracked quote ids are cancelled
//!   and a fresh two-sided quote is placed one tick inside the touch.
//! - **Wide**: everything else. Buy and sell sides are evaluated
//!   independently from the cumulative imbalance ladder and inventory
//!   thresholds; each side emits at most one one-shot order.
//!
//! Every price carries the inventory skew `delta = -skew * P / L`, is
//! rounded onto the tick grid (bids down, asks up) and then bounded so it
//! never crosses the inside market.
//!
//! The only state kept across rounds is the tracked tight quote per ticker.

use std::collections::HashMap;

use ritmm_book::{BookError, Imbalance, ImbalanceVector, OrderBookSnapshot};
use ritmm_core::{OrderId, OrderSide, Price, Size, Ticker};
use rust_decimal::Decimal;
use tracing::debug;

use crate::config::{InventoryThresholds, MakerConfig, TickerConfig};
use crate::error::MakerResult;

/// A resting order the engine placed and tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub side: OrderSide,
    pub price: Price,
    pub size: Size,
    pub order_id: OrderId,
}

/// Tight-branch quote ids tracked for cancel-before-replace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedQuote {
    pub bid: Option<Quote>,
    pub ask: Option<Quote>,
}

impl TrackedQuote {
    pub fn is_empty(&self) -> bool {
        self.bid.is_none() && self.ask.is_none()
    }

    /// Tracked ids, bid first.
    pub fn order_ids(&self) -> Vec<OrderId> {
        self.bid
            .iter()
            .chain(self.ask.iter())
            .map(|q| q.order_id)
            .collect()
    }
}

/// Quote state of one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteState {
    NoQuote,
    TightQuoted,
}

/// Why an order was planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderReason {
    /// Two-sided tight quote.
    Tight,
    /// Imbalance ladder at the given 1-based book level.
    Ladder { level: usize },
    /// Inventory-reducing order priced like the tight quote.
    Secondary,
}

impl OrderReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tight => "tight",
            Self::Ladder { .. } => "ladder",
            Self::Secondary => "secondary",
        }
    }
}

/// An order the executor should place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOrder {
    pub side: OrderSide,
    pub price: Price,
    pub size: Size,
    pub reason: OrderReason,
}

/// Output of one decision for one ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteDecision {
    /// Cancel `cancels`, then place `bid` and `ask` and track them.
    Tight {
        cancels: Vec<OrderId>,
        bid: PlannedOrder,
        ask: PlannedOrder,
    },
    /// Tight branch taken but the bounded prices cross each other.
    /// Tracked ids are still cancelled; nothing is placed.
    TightCrossed {
        cancels: Vec<OrderId>,
        bid: Price,
        ask: Price,
    },
    /// Independent one-shot orders; tracked state is left alone.
    Wide {
        buy: Option<PlannedOrder>,
        sell: Option<PlannedOrder>,
    },
}

impl QuoteDecision {
    pub fn branch(&self) -> &'static str {
        match self {
            Self::Tight { .. } | Self::TightCrossed { .. } => "tight",
            Self::Wide { .. } => "wide",
        }
    }
}

/// Market inputs for one ticker in one round.
#[derive(Debug, Clone, Copy)]
struct Touch {
    best_bid: Price,
    best_ask: Price,
    tick: Price,
    delta: Decimal,
}

impl Touch {
    /// `best_bid + tick + delta`, bounded inside the spread.
    fn improve_bid(&self) -> Price {
        let lo = self.best_bid + self.tick;
        let hi = self.best_ask - self.tick;
        (lo + self.delta)
            .floor_to_tick(self.tick)
            .bound_from_below(lo, hi)
    }

    /// `best_ask - tick + delta`, bounded inside the spread.
    fn improve_ask(&self) -> Price {
        let lo = self.best_bid + self.tick;
        let hi = self.best_ask - self.tick;
        (hi + self.delta)
            .ceil_to_tick(self.tick)
            .bound_from_above(lo, hi)
    }
}

/// Quoting decision engine.
#[derive(Debug)]
pub struct QuoteEngine {
    config: MakerConfig,
    thresholds: InventoryThresholds,
    tracked: HashMap<Ticker, TrackedQuote>,
}

impl QuoteEngine {
    pub fn new(config: MakerConfig) -> Self {
        let thresholds = config.thresholds();
        Self {
            config,
            thresholds,
            tracked: HashMap::new(),
        }
    }

    pub fn config(&self) -> &MakerConfig {
        &self.config
    }

    /// Inventory skew `-skew * P / L`. Non-increasing in `position`.
    pub fn inventory_skew(&self, position: i64) -> Decimal {
        -self.config.skew_coefficient * Decimal::from(position) / self.config.position_limit
    }

    pub fn state(&self, ticker: &Ticker) -> QuoteState {
        match self.tracked.get(ticker) {
            Some(t) if !t.is_empty() => QuoteState::TightQuoted,
            _ => QuoteState::NoQuote,
        }
    }

    pub fn tracked(&self, ticker: &Ticker) -> Option<&TrackedQuote> {
        self.tracked.get(ticker)
    }

    /// Replace the tracked tight quote with whatever legs were placed.
    pub fn record_tight_quote(&mut self, ticker: &Ticker, bid: Option<Quote>, ask: Option<Quote>) {
        let tracked = TrackedQuote { bid, ask };
        if tracked.is_empty() {
            self.tracked.remove(ticker);
        } else {
            self.tracked.insert(ticker.clone(), tracked);
        }
    }

    /// Forget tracked ids, e.g. after they were cancelled.
    pub fn clear_tracked(&mut self, ticker: &Ticker) {
        self.tracked.remove(ticker);
    }

    /// Decide what to do for one ticker this round.
    ///
    /// The tight branch only reads the touch. The wide branch needs
    /// `depth` levels in the snapshot and in both imbalance vectors;
    /// a shallower book fails with `MalformedBook` there.
    pub fn decide(
        &self,
        ticker_cfg: &TickerConfig,
        position: i64,
        snapshot: &OrderBookSnapshot,
        imbalance: &Imbalance,
    ) -> MakerResult<QuoteDecision> {
        snapshot.require_depth(1)?;
        let (best_bid, best_ask) = match (snapshot.best_bid(), snapshot.best_ask()) {
            (Some(b), Some(a)) => (b, a),
            _ => return Err(malformed(1, 0).into()),
        };

        let touch = Touch {
            best_bid,
            best_ask,
            tick: self.config.tick_size,
            delta: self.inventory_skew(position),
        };
        let p = Decimal::from(position);
        let spread = best_ask - best_bid;

        let decision = if spread >= ticker_cfg.min_spread && p.abs() < self.thresholds.tight_abs {
            self.decide_tight(&ticker_cfg.ticker, ticker_cfg.order_size, &touch)
        } else {
            self.require_ladder_depth(snapshot, imbalance)?;
            QuoteDecision::Wide {
                buy: self.decide_buy(ticker_cfg.order_size, p, snapshot, &imbalance.bid, &touch)?,
                sell: self.decide_sell(ticker_cfg.order_size, p, snapshot, &imbalance.ask, &touch)?,
            }
        };

        debug!(
            ticker = %ticker_cfg.ticker,
            position,
            %spread,
            delta = %touch.delta,
            branch = decision.branch(),
            "Quote decision"
        );

        Ok(decision)
    }

    fn decide_tight(&self, ticker: &Ticker, size: Size, touch: &Touch) -> QuoteDecision {
        let cancels = self
            .tracked
            .get(ticker)
            .map(TrackedQuote::order_ids)
            .unwrap_or_default();
        let bid = touch.improve_bid();
        let ask = touch.improve_ask();

        if bid >= ask {
            return QuoteDecision::TightCrossed { cancels, bid, ask };
        }

        QuoteDecision::Tight {
            cancels,
            bid: PlannedOrder {
                side: OrderSide::Buy,
                price: bid,
                size,
                reason: OrderReason::Tight,
            },
            ask: PlannedOrder {
                side: OrderSide::Sell,
                price: ask,
                size,
                reason: OrderReason::Tight,
            },
        }
    }

    fn decide_buy(
        &self,
        size: Size,
        p: Decimal,
        snapshot: &OrderBookSnapshot,
        bid_obs: &ImbalanceVector,
        touch: &Touch,
    ) -> MakerResult<Option<PlannedOrder>> {
        let k = self.config.imbalance_pivot;
        let tick = touch.tick;
        let hi = touch.best_ask - tick;
        let top = obs_at(bid_obs, 1)?;

        // Secondary buy supersedes the ladder so the side emits one order.
        if p < self.thresholds.buy_secondary && top >= k {
            return Ok(Some(PlannedOrder {
                side: OrderSide::Buy,
                price: touch.improve_bid(),
                size,
                reason: OrderReason::Secondary,
            }));
        }
        if p >= self.thresholds.buy_ladder {
            return Ok(None);
        }

        let level = match self.ladder_level(bid_obs)? {
            Some(level) => level,
            None => return Ok(None),
        };
        let price = if level == 1 {
            let lo = touch.best_bid;
            (lo + touch.delta).floor_to_tick(tick).bound_from_below(lo, hi)
        } else {
            let lo = level_price(snapshot.bids(), level)? + tick;
            (lo + touch.delta).floor_to_tick(tick).bound_from_below(lo, hi)
        };

        Ok(Some(PlannedOrder {
            side: OrderSide::Buy,
            price,
            size,
            reason: OrderReason::Ladder { level },
        }))
    }

    fn decide_sell(
        &self,
        size: Size,
        p: Decimal,
        snapshot: &OrderBookSnapshot,
        ask_obs: &ImbalanceVector,
        touch: &Touch,
    ) -> MakerResult<Option<PlannedOrder>> {
        let k = self.config.imbalance_pivot;
        let tick = touch.tick;
        let lo = touch.best_bid + tick;
        let top = obs_at(ask_obs, 1)?;

        if p > self.thresholds.sell_secondary && top >= k {
            return Ok(Some(PlannedOrder {
                side: OrderSide::Sell,
                price: touch.improve_ask(),
                size,
                reason: OrderReason::Secondary,
            }));
        }
        if p <= self.thresholds.sell_ladder {
            return Ok(None);
        }

        let level = match self.ladder_level(ask_obs)? {
            Some(level) => level,
            None => return Ok(None),
        };
        let price = if level == 1 {
            let hi = touch.best_ask;
            (hi + touch.delta).ceil_to_tick(tick).bound_from_above(lo, hi)
        } else {
            let hi = level_price(snapshot.asks(), level)? - tick;
            (hi + touch.delta).ceil_to_tick(tick).bound_from_above(lo, hi)
        };

        Ok(Some(PlannedOrder {
            side: OrderSide::Sell,
            price,
            size,
            reason: OrderReason::Ladder { level },
        }))
    }

    fn require_ladder_depth(
        &self,
        snapshot: &OrderBookSnapshot,
        imbalance: &Imbalance,
    ) -> MakerResult<()> {
        let depth = self.config.depth;
        snapshot.require_depth(depth)?;
        let covered = imbalance.bid.len().min(imbalance.ask.len());
        if covered < depth {
            return Err(malformed(depth, covered).into());
        }
        Ok(())
    }

    /// Deepest level `k` in `2..=D` with `obs[k-1] < K <= obs[k]`, falling
    /// back to level 1 when `obs[1] >= K`.
    fn ladder_level(&self, obs: &ImbalanceVector) -> MakerResult<Option<usize>> {
        let k = self.config.imbalance_pivot;
        for level in (2..=self.config.depth).rev() {
            let below = obs_at(obs, level - 1)?;
            let at = obs_at(obs, level)?;
            if below < k && k <= at {
                return Ok(Some(level));
            }
        }
        if obs_at(obs, 1)? >= k {
            return Ok(Some(1));
        }
        Ok(None)
    }
}

fn malformed(required: usize, available: usize) -> BookError {
    BookError::MalformedBook {
        required,
        available,
    }
}

fn obs_at(obs: &ImbalanceVector, level: usize) -> MakerResult<Decimal> {
    obs.level(level)
        .ok_or_else(|| malformed(level, obs.len()).into())
}

fn level_price(levels: &[ritmm_core::DepthLevel], level: usize) -> MakerResult<Price> {
    levels
        .get(level - 1)
        .map(|l| l.price)
        .ok_or_else(|| malformed(level, levels.len()).into())
}
