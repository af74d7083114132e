//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Integer minor units don't fit either: KWD has 3 decimals, SAR has 2,  │
//! │  and a converted price (10 KWD → 122.5 SAR) is rarely a whole number   │
//! │  of fils.                                                               │
//! │                                                                         │
//! │  OUR SOLUTION: base-ten Decimal (96-bit mantissa, scale 0..=28)        │
//! │    0.1 + 0.2 = 0.3 exactly                                              │
//! │    subtotal × 10% keeps every digit, no intermediate rounding          │
//! │    Rounding only happens when formatting for display                   │
//! │                                                                         │
//! │  Arithmetic saturates at ±Decimal::MAX instead of panicking; a value   │
//! │  at the limit reports is_saturated().                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Currency Context
//! `Money` carries no currency tag. Everything the cart engine stores is in
//! the base currency (KWD); values returned by [`crate::currency::convert`]
//! are in whatever target currency was requested.
//!
//! ## Usage
//! ```rust
//! use pixelvault_core::money::Money;
//!
//! let price = Money::new(12_500, 3); // 12.500
//! let line = price.multiply_quantity(2);
//! assert_eq!(line, Money::new(25, 0));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

use crate::currency::{self, Currency};

// =============================================================================
// Money Type
// =============================================================================

/// An exact decimal monetary amount.
///
/// ## Design Decisions
/// - **Decimal (signed)**: subtraction during totals may dip below zero
///   before the total is floored
/// - **Single field tuple struct**: zero-cost wrapper over `Decimal`
/// - **Serialized as a JSON number**: the persisted cart snapshot keeps the
///   storefront's `{"subtotal": 25}` layout. Numbers travel through `f64`,
///   so only amounts up to 15 significant digits round-trip exactly; every
///   catalog price and cart total sits far below that.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──► CartLine.unit_price ──► CartLine::line_total()      │
/// │                                                                         │
/// │  CartState.subtotal + shipping_cost - discount_amount ──► total        │
/// │                                                                         │
/// │  total ──► currency::convert ──► currency::format ──► "SR 330.75"      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] Decimal);

impl Money {
    /// Creates a Money value from a mantissa and a scale.
    ///
    /// ## Example
    /// ```rust
    /// use pixelvault_core::money::Money;
    ///
    /// let price = Money::new(2_500, 3); // 2.500
    /// assert_eq!(price.to_string(), "KD 2.500");
    /// ```
    #[inline]
    pub fn new(num: i64, scale: u32) -> Self {
        Money(Decimal::new(num, scale))
    }

    /// Const constructor for non-negative amounts that fit in 32 bits of
    /// mantissa. Used for compile-time constants such as the shipping fee.
    #[inline]
    pub const fn from_parts(mantissa: u32, scale: u32) -> Self {
        Money(Decimal::from_parts(mantissa, 0, 0, false, scale))
    }

    /// Wraps an existing decimal.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Largest representable amount; saturated arithmetic stops here.
    pub const MAX: Money = Money(Decimal::MAX);

    /// Smallest representable amount.
    pub const MIN: Money = Money(Decimal::MIN);

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// True when the amount sits at the representable limit, i.e. some
    /// arithmetic producing it overflowed.
    #[inline]
    pub fn is_saturated(&self) -> bool {
        self.0 == Decimal::MAX || self.0 == Decimal::MIN
    }

    /// Multiplies money by a quantity, saturating on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use pixelvault_core::money::Money;
    ///
    /// let unit_price = Money::new(2_990, 3);
    /// assert_eq!(unit_price.multiply_quantity(3), Money::new(8_970, 3));
    /// ```
    #[inline]
    pub fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(Decimal::from(qty)))
    }

    /// Returns `percent`% of this amount, without rounding. Saturates on
    /// overflow.
    ///
    /// ## Example
    /// ```rust
    /// use pixelvault_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let subtotal = Money::new(25, 0);
    /// assert_eq!(subtotal.percentage(Decimal::from(10)), Money::new(25, 1));
    /// ```
    pub fn percentage(&self, percent: Decimal) -> Self {
        match self.0.checked_mul(percent) {
            Some(product) => Money(product / Decimal::ONE_HUNDRED),
            None => Money(self.0.saturating_mul(percent)),
        }
    }

    /// Floors the amount at zero.
    ///
    /// A discount larger than the subtotal plus shipping must never produce a
    /// negative grand total.
    #[inline]
    pub fn clamp_non_negative(self) -> Self {
        if self.is_negative() {
            Money::zero()
        } else {
            self
        }
    }

    /// Rounds half away from zero to `dp` decimal places.
    ///
    /// ## Example
    /// ```rust
    /// use pixelvault_core::money::Money;
    ///
    /// assert_eq!(Money::new(12_345, 4).round_dp(3), Money::new(1_235, 3));
    /// ```
    pub fn round_dp(&self, dp: u32) -> Self {
        Money(self.0.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Converts this base-currency amount into `currency_code`.
    ///
    /// Unknown codes fall back to the default currency.
    pub fn to_currency(&self, currency_code: &str) -> Money {
        currency::convert(*self, currency::BASE_CURRENCY, currency_code)
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display renders the amount in the base currency, LTR.
///
/// ## Note
/// This is for logs and debugging. Use [`currency::format`] with the
/// shopper's currency and direction for storefront output.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&currency::format(*self, Currency::base(), false))
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by a plain decimal factor (exchange rates), saturating.
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, factor: Decimal) -> Self {
        Money(self.0.saturating_mul(factor))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_addition_is_exact() {
        let a = Money::new(1, 1);
        let b = Money::new(2, 1);
        assert_eq!(a + b, Money::new(3, 1));
    }

    #[test]
    fn test_const_constructor_matches_new() {
        assert_eq!(Money::from_parts(2000, 3), Money::new(2, 0));
        assert_eq!(crate::FLAT_SHIPPING_FEE, Money::new(2, 0));
    }

    #[test]
    fn test_percentage_keeps_full_precision() {
        let subtotal = Money::new(3_333, 3);
        // 3.333 × 15% = 0.49995, no rounding
        assert_eq!(
            subtotal.percentage(Decimal::from(15)),
            Money::new(49_995, 5)
        );
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::new(-5, 0).clamp_non_negative(), Money::zero());
        assert_eq!(Money::new(5, 0).clamp_non_negative(), Money::new(5, 0));
        assert!(!Money::new(0, 3).is_negative());
    }

    #[test]
    fn test_sum() {
        let total: Money = [Money::new(10, 0), Money::new(5, 0), Money::new(250, 3)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::new(15_250, 3));
    }

    #[test]
    fn test_overflow_saturates_instead_of_panicking() {
        let huge = Money::from_decimal(Decimal::from_scientific("5e28").unwrap());
        assert_eq!(huge.multiply_quantity(2), Money::MAX);
        assert_eq!(Money::MAX + Money::new(1, 0), Money::MAX);
        assert_eq!(Money::MIN - Money::new(1, 0), Money::MIN);
        assert_eq!(huge * Decimal::from(3), Money::MAX);
        assert!(huge.multiply_quantity(2).is_saturated());
        assert!(!huge.is_saturated());

        let percent = Decimal::from(10u64.pow(16));
        assert!(Money::from_decimal(percent).percentage(percent).is_saturated());
    }

    #[test]
    fn test_serializes_as_json_number() {
        let json = serde_json::to_string(&Money::new(245, 1)).unwrap();
        assert_eq!(json, "24.5");

        let parsed: Money = serde_json::from_str("10").unwrap();
        assert_eq!(parsed, Money::new(10, 0));

        let parsed: Money = serde_json::from_str("12.25").unwrap();
        assert_eq!(parsed, Money::new(1225, 2));
    }

    #[test]
    fn test_fils_precision_round_trips_through_json() {
        for amount in [
            Money::new(1, 3),
            Money::new(19_995, 3),
            Money::new(123_456_789_125, 3),
        ] {
            let json = serde_json::to_string(&amount).unwrap();
            let back: Money = serde_json::from_str(&json).unwrap();
            assert_eq!(back, amount, "{json}");
        }
    }

    #[test]
    fn test_display_uses_base_currency() {
        assert_eq!(Money::new(1_234_5, 1).to_string(), "KD 1,234.500");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(" 7.25 ".parse::<Money>().unwrap(), Money::new(725, 2));
        assert!("seven".parse::<Money>().is_err());
    }
}
