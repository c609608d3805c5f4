//! Type-safe price representation using decimal arithmetic.
//!
//! The inventory service reports prices as plain JSON numbers, so `Price`
//! serializes as a number rather than the string form `rust_decimal` uses by
//! default.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A unit price in the store's currency.
///
/// Arithmetic saturates at the bounds of `Decimal` instead of panicking,
/// since prices come from outside the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an amount in cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        self * quantity
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{:.2}", self.0))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(rhs)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_serializes_as_number() {
        let price = Price::from_cents(17_990);
        assert_eq!(serde_json::to_string(&price).unwrap(), "179.9");
    }

    #[test]
    fn test_price_deserializes_from_number() {
        let price: Price = serde_json::from_str("139.9").unwrap();
        assert_eq!(price, Price::from_cents(13_990));

        let whole: Price = serde_json::from_str("200").unwrap();
        assert_eq!(whole, Price::from_cents(20_000));
    }

    #[test]
    fn test_price_display_two_decimals() {
        assert_eq!(Price::from_cents(17_990).to_string(), "179.90");
        assert_eq!(Price::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_price_arithmetic() {
        let total: Price = [Price::from_cents(1_050).times(2), Price::from_cents(99)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(2_199));
    }

    #[test]
    fn test_price_arithmetic_saturates() {
        let huge = Price::new(Decimal::MAX);

        assert_eq!(huge.times(3), huge);
        assert_eq!(huge + huge, huge);
        assert_eq!([huge, huge, Price::from_cents(1)].into_iter().sum::<Price>(), huge);
    }
}
