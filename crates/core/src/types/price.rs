//! Type-safe price representation using decimal arithmetic.
//!
//! The commerce API quotes every amount in Egyptian pounds as a plain JSON
//! number. The storefront never does price arithmetic of its own (totals come
//! back from the API), so [`Price`] is only about reading and displaying.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency suffix used when displaying prices.
pub const CURRENCY_CODE: &str = "EGP";

/// A price in EGP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of pounds.
    #[must_use]
    pub fn from_pounds(pounds: i64) -> Self {
        Self(Decimal::from(pounds))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// This price multiplied by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    /// Formats as `"<amount> EGP"` with trailing zeros dropped, e.g. `150 EGP`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {CURRENCY_CODE}", self.0.normalize())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}
