//! Precision-safe decimal types for quoting.
//!
//! Prices and sizes come off the wire as JSON floats, so everything is
//! converted into `rust_decimal::Decimal` once at the gateway boundary and
//! kept exact from there on.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

/// Constructors, accessors, parsing and display shared by the
/// `Decimal` newtypes below.
macro_rules! decimal_newtype {
    ($name:ident) => {
        impl $name {
            pub const ZERO: Self = Self(Decimal::ZERO);

            #[inline]
            pub fn new(value: Decimal) -> Self {
                Self(value)
            }

            #[inline]
            pub fn inner(&self) -> Decimal {
                self.0
            }

            #[inline]
            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }

            /// Strictly greater than zero.
            #[inline]
            pub fn is_positive(&self) -> bool {
                self.0 > Decimal::ZERO
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = rust_decimal::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }

        impl From<Decimal> for $name {
            fn from(value: Decimal) -> Self {
                Self(value)
            }
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }
    };
}

/// Limit price on the exchange's tick grid.
///
/// Kept apart from [`Size`] so the two cannot be mixed up in arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(pub Decimal);

decimal_newtype!(Price);

impl Price {
    /// Round down onto the tick grid. Used for bids.
    pub fn floor_to_tick(&self, tick: Price) -> Self {
        if tick.is_zero() {
            return *self;
        }
        Self((self.0 / tick.0).floor() * tick.0)
    }

    /// Round up onto the tick grid. Used for asks.
    pub fn ceil_to_tick(&self, tick: Price) -> Self {
        if tick.is_zero() {
            return *self;
        }
        Self((self.0 / tick.0).ceil() * tick.0)
    }

    /// `max(self, lo)` then `min(.., hi)`.
    ///
    /// Unlike `Ord::clamp` this never panics when the bounds cross; the
    /// upper bound wins, which keeps a bid from crossing the inside ask.
    pub fn bound_from_below(&self, lo: Price, hi: Price) -> Self {
        (*self).max(lo).min(hi)
    }

    /// `min(self, hi)` then `max(.., lo)`.
    ///
    /// Mirror of [`Price::bound_from_below`]: the lower bound wins when the
    /// bounds cross, which keeps an ask from crossing the inside bid.
    pub fn bound_from_above(&self, lo: Price, hi: Price) -> Self {
        (*self).min(hi).max(lo)
    }
}

/// A price nudged by a raw offset, e.g. the inventory skew.
impl Add<Decimal> for Price {
    type Output = Self;

    fn add(self, rhs: Decimal) -> Self {
        Self(self.0 + rhs)
    }
}

/// Order or level quantity in shares.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Size(pub Decimal);

decimal_newtype!(Size);

impl Size {
    /// Cash value of this quantity at `price`.
    pub fn notional(&self, price: Price) -> Decimal {
        self.0 * price.0
    }
}

impl From<u32> for Size {
    fn from(shares: u32) -> Self {
        Self(Decimal::from(shares))
    }
}

impl AddAssign for Size {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}
