//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Integer Cents, Decimal Intermediates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHERE PRECISION LIVES                                                  │
//! │                                                                         │
//! │  Stored amounts (unit price, subtotal, tax, total) ──► Money (cents)   │
//! │                                                                         │
//! │  base_cost × (1 + overhead%) × (1 − volume discount) ──► Decimal       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Money::from_decimal() ── rounds ONCE, half away from zero             │
//! │                                                                         │
//! │  f64 never appears in a price calculation.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tezza_core::money::Money;
//! use rust_decimal_macros::dec;
//!
//! let unit = Money::from_cents(785);         // $7.85
//! let line = unit.checked_mul(50).unwrap();  // $392.50
//! assert_eq!(line.cents(), 39250);
//!
//! // 19.625 rounds half-up to 19.63
//! assert_eq!(Money::from_decimal(dec!(19.625)).cents(), 1963);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Percentage;

/// Number of decimal places every monetary figure is rounded to.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Rounding applied to every monetary and reported figure in the engine.
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Rounds a decimal to two places using the engine-wide strategy.
///
/// ```rust
/// use tezza_core::money::round2;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round2(dec!(17.504)), dec!(17.50));
/// assert_eq!(round2(dec!(2.675)), dec!(2.68));
/// ```
#[inline]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, ROUNDING)
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative inputs stay representable so validation can
///   reject them with a typed error instead of a parse failure
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serialized as cents**: the API layer formats for display
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.base_cost ──► unit_price() ──► LineItem.unit_price            │
/// │                                              │                          │
/// │                                              ▼                          │
/// │                              LineItem.line_total = unit_price × qty    │
/// │                                              │                          │
/// │  Order.subtotal ──► discount ──► tax ──► + shipping ──► total_amount   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tezza_core::money::Money;
    ///
    /// let cost = Money::from_cents(500); // Represents $5.00
    /// assert_eq!(cost.cents(), 500);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts an exact decimal amount (in dollars) to Money, rounding to
    /// the nearest cent with ties away from zero.
    ///
    /// Amounts beyond the i64 cent range saturate.
    pub fn from_decimal(amount: Decimal) -> Self {
        let cents = (amount * Decimal::ONE_HUNDRED).round_dp_with_strategy(0, ROUNDING);
        let cents = cents.to_i64().unwrap_or(if cents.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        });
        Money(cents)
    }

    /// Returns the amount in dollars as an exact decimal (`1099` → `10.99`).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, MONEY_DECIMAL_PLACES)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Computes `self × percentage`, rounded to the cent.
    ///
    /// Used for the order-level discount amount and for tax. Returns `None`
    /// when the product leaves the decimal range.
    ///
    /// ## Example
    /// ```rust
    /// use tezza_core::money::Money;
    /// use tezza_core::types::Percentage;
    /// use rust_decimal_macros::dec;
    ///
    /// let subtotal = Money::from_cents(39250);          // $392.50
    /// let discount = subtotal.percent_of(Percentage::new(dec!(5))).unwrap();
    /// // $392.50 × 5% = $19.625 → $19.63
    /// assert_eq!(discount.cents(), 1963);
    /// ```
    pub fn percent_of(&self, percentage: Percentage) -> Option<Money> {
        self.to_decimal()
            .checked_mul(percentage.fraction())
            .map(Money::from_decimal)
    }

    /// Multiplies money by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tezza_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(785); // $7.85
    /// assert_eq!(unit_price.checked_mul(50), Some(Money::from_cents(39250)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul(self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        write!(f, "{}${}.{:02}", sign, magnitude / 100, magnitude % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_display_extremes() {
        assert_eq!(
            Money::from_cents(i64::MIN).to_string(),
            "-$92233720368547758.08"
        );
        assert_eq!(
            Money::from_cents(i64::MAX).to_string(),
            "$92233720368547758.07"
        );
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.checked_mul(3), Some(Money::from_cents(3000)));
        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_decimal_round_trip() {
        assert_eq!(Money::from_cents(39250).to_decimal(), dec!(392.50));
        assert_eq!(Money::from_decimal(dec!(392.50)).cents(), 39250);
    }

    #[test]
    fn test_from_decimal_rounds_half_away_from_zero() {
        assert_eq!(Money::from_decimal(dec!(19.625)).cents(), 1963);
        assert_eq!(Money::from_decimal(dec!(19.615)).cents(), 1962);
        assert_eq!(Money::from_decimal(dec!(31.69395)).cents(), 3169);
        assert_eq!(Money::from_decimal(dec!(-0.005)).cents(), -1);
    }

    #[test]
    fn test_percent_of() {
        let subtotal = Money::from_cents(37287);
        // 372.87 × 8.5% = 31.69395 → 31.69
        assert_eq!(
            subtotal.percent_of(Percentage::new(dec!(8.5))),
            Some(Money::from_cents(3169))
        );
        assert_eq!(subtotal.percent_of(Percentage::zero()), Some(Money::zero()));
    }

    #[test]
    fn test_checked_arithmetic_overflow() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max.checked_mul(2), None);
        assert_eq!(max.checked_add(Money::from_cents(1)), None);
        assert_eq!(Money::from_cents(i64::MIN).checked_mul(-1), None);
        assert_eq!(max.percent_of(Percentage::new(Decimal::MAX)), None);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(dec!(17.5)), dec!(17.50));
        assert_eq!(round2(dec!(0.125)), dec!(0.13));
        assert_eq!(round2(dec!(762.499)), dec!(762.50));
    }
}
