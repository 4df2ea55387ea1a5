//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE PACKAGING PROBLEM                                                  │
//! │                                                                         │
//! │  A box of 12 tiles bought at 125.00 per box:                           │
//! │    price per tile = 125.00 / 12 = 10.41666...                          │
//! │                                                                         │
//! │  Integer cents would store 10.42 and the box would re-cost at 125.04.  │
//! │  f64 would drift on every sum of 10.41666... values.                   │
//! │                                                                         │
//! │  OUR SOLUTION: 96-bit Decimal, rounded only where the money is final   │
//! │    125.00 / 12 × 12 = 125.00 (28 significant digits carried)           │
//! │    Tax amounts are rounded to the money scale when they are computed   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use landed_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let box_price = Money::new(Decimal::new(12000, 2)); // 120.00 per box
//! let per_piece = box_price / Decimal::from(12);       // 10.00 per piece
//! assert_eq!(per_piece * Decimal::from(12), box_price);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use ts_rs::TS;

use crate::types::TaxRate;

/// Default number of decimal places for money (paise, cents).
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01).
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the invoice currency.
///
/// ## Design Decisions
/// - **Decimal, not cents**: per-base-unit prices are fractions of the
///   packaging price and must multiply back exactly
/// - **Unrounded by default**: rounding happens at named points
///   ([`Money::round_dp`]), never implicitly inside arithmetic
/// - **Newtype serde**: serializes as the bare decimal string, e.g. `"1180.00"`
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem.bill_price ──► NormalizedItem.bill_price_base                 │
/// │                                 │                                       │
/// │                                 ├──► tax_amount ──► cgst / sgst         │
/// │                                 │                                       │
/// │  OverheadCharge.amount ──► total_other_expenses ──► per-unit overhead  │
/// │                                                                         │
/// │  Everything above folds into InvoiceTotals.grand_total                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Zero money.
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// Wraps a decimal amount.
    #[inline]
    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money::ZERO
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
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

    /// Rounds half away from zero to `dp` decimal places.
    ///
    /// ## Example
    /// ```rust
    /// use landed_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let raw = Money::new(Decimal::new(21_6005, 3)); // 216.005
    /// assert_eq!(raw.round_dp(2).amount(), Decimal::new(21_601, 2)); // 216.01
    /// ```
    pub fn round_dp(&self, dp: u32) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Splits an amount into two exact halves.
    ///
    /// The halves are never rounded individually: 0.05 splits into
    /// 0.025 + 0.025, so `a + b` always equals the original.
    #[inline]
    pub fn halve(&self) -> Money {
        Money(self.0 / Decimal::TWO)
    }

    /// Returns `rate` percent of this amount, unrounded, or `None` when
    /// the product leaves the decimal range.
    ///
    /// ## Example
    /// ```rust
    /// use landed_core::money::Money;
    /// use landed_core::types::TaxRate;
    /// use rust_decimal::Decimal;
    ///
    /// let line = Money::new(Decimal::from(1200));
    /// let tax = line.checked_percent(TaxRate::from_percent(Decimal::from(18)));
    /// assert_eq!(tax, Some(Money::new(Decimal::from(216))));
    /// ```
    #[inline]
    pub fn checked_percent(&self, rate: TaxRate) -> Option<Money> {
        self.0
            .checked_mul(rate.percent())?
            .checked_div(Decimal::ONE_HUNDRED)
            .map(Money)
    }

    /// `self + other`, or `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// `self - other`, or `None` on overflow.
    #[inline]
    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// `self × factor`, or `None` on overflow.
    #[inline]
    pub fn checked_mul(&self, factor: Decimal) -> Option<Money> {
        self.0.checked_mul(factor).map(Money)
    }

    /// `self ÷ divisor`, or `None` on overflow or a zero divisor.
    #[inline]
    pub fn checked_div(&self, divisor: Decimal) -> Option<Money> {
        self.0.checked_div(divisor).map(Money)
    }

    /// True when `self` and `other` differ by no more than `tolerance`.
    pub fn nearly_equal(&self, other: Money, tolerance: Decimal) -> bool {
        self.0
            .checked_sub(other.0)
            .is_some_and(|diff| diff.abs() <= tolerance)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money at the default money scale. Use frontend formatting for
/// currency symbols and grouping.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.round_dp(MONEY_DECIMAL_PLACES).0;
        write!(f, "{:.2}", rounded)
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

/// Multiplication by a quantity (line value = unit price × quantity).
impl Mul<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: Decimal) -> Self {
        Money(self.0 * qty)
    }
}

/// Division by a quantity or ratio. Callers guarantee a non-zero divisor.
impl Div<Decimal> for Money {
    type Output = Self;

    #[inline]
    fn div(self, divisor: Decimal) -> Self {
        Money(self.0 / divisor)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
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
    fn test_display() {
        assert_eq!(Money::new(dec!(10.99)).to_string(), "10.99");
        assert_eq!(Money::new(dec!(5)).to_string(), "5.00");
        assert_eq!(Money::new(dec!(-5.5)).to_string(), "-5.50");
        assert_eq!(Money::new(dec!(10.416666)).to_string(), "10.42");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::new(dec!(10.00));
        let b = Money::new(dec!(5.00));

        assert_eq!(a + b, Money::new(dec!(15.00)));
        assert_eq!(a - b, Money::new(dec!(5.00)));
        assert_eq!(a * dec!(3), Money::new(dec!(30.00)));
        assert_eq!(a / dec!(4), Money::new(dec!(2.5)));
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::new(dec!(10.00));
        assert_eq!(a.checked_add(a), Some(Money::new(dec!(20))));
        assert_eq!(a.checked_sub(a), Some(Money::ZERO));
        assert_eq!(a.checked_mul(dec!(3)), Some(Money::new(dec!(30))));
        assert_eq!(a.checked_div(dec!(4)), Some(Money::new(dec!(2.5))));
        assert_eq!(a.checked_div(Decimal::ZERO), None);

        let huge = Money::new(Decimal::MAX);
        assert_eq!(huge.checked_add(a), None);
        assert_eq!(huge.checked_mul(dec!(2)), None);
        assert_eq!(huge.checked_div(dec!(0.0000000001)), None);
        assert_eq!(huge.checked_percent(TaxRate::from_percent(dec!(18))), None);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(Money::new(dec!(0.125)).round_dp(2), Money::new(dec!(0.13)));
        assert_eq!(Money::new(dec!(0.135)).round_dp(2), Money::new(dec!(0.14)));
        assert_eq!(Money::new(dec!(-0.125)).round_dp(2), Money::new(dec!(-0.13)));
    }

    #[test]
    fn test_halves_are_exact() {
        let odd = Money::new(dec!(0.05));
        let half = odd.halve();
        assert_eq!(half, Money::new(dec!(0.025)));
        assert_eq!(half + half, odd);
    }

    #[test]
    fn test_packaging_price_survives_round_trip() {
        let box_price = Money::new(dec!(125.00));
        let per_piece = box_price / dec!(12);
        assert!((per_piece * dec!(12)).nearly_equal(box_price, dec!(0.0000001)));
    }

    #[test]
    fn test_sum() {
        let values = [Money::new(dec!(1.10)), Money::new(dec!(2.20)), Money::new(dec!(3.30))];
        let total: Money = values.iter().sum();
        assert_eq!(total, Money::new(dec!(6.60)));
        assert_eq!(Vec::<Money>::new().into_iter().sum::<Money>(), Money::ZERO);
    }

    #[test]
    fn test_serializes_as_string() {
        let json = serde_json::to_string(&Money::new(dec!(1180.00))).unwrap();
        assert_eq!(json, "\"1180.00\"");
        let back: Money = serde_json::from_str("\"90.00\"").unwrap();
        assert_eq!(back, Money::new(dec!(90)));
    }

    #[test]
    fn test_parse() {
        assert_eq!(" 12.50 ".parse::<Money>().unwrap(), Money::new(dec!(12.5)));
        assert!("twelve".parse::<Money>().is_err());
    }
}
