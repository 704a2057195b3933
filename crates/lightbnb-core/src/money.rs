//! # Money
//!
//! Nightly rates are stored in cents; search forms speak whole dollars.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Search form:     "max price: 200"         (whole dollars)              │
//! │  Database column: cost_per_night = 20000   (cents)                      │
//! │                                                                         │
//! │  Money::from_dollars(200).cents() == 20000                              │
//! │                                                                         │
//! │  The conversion happens exactly once, when a filter is bound.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```rust
//! use lightbnb_core::money::Money;
//!
//! let nightly = Money::from_dollars(125);
//! assert_eq!(nightly.cents(), 12500);
//! assert_eq!(nightly.for_nights(3).to_string(), "$375.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Cents per dollar.
pub const CENTS_PER_DOLLAR: i64 = 100;

/// An amount in cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts whole dollars to cents, saturating at the `i64` bounds.
    #[inline]
    pub const fn from_dollars(dollars: i64) -> Self {
        Money(dollars.saturating_mul(CENTS_PER_DOLLAR))
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Cost of a stay at this nightly rate.
    #[inline]
    pub const fn for_nights(&self, nights: i64) -> Self {
        Money(self.0.saturating_mul(nights))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = CENTS_PER_DOLLAR.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, abs / per, abs % per)
    }
}
