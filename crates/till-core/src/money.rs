//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Catalog price 1.4 × 3 in floating point:                              │
//! │    4.199999999999999  ❌ WRONG on a receipt!                            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    140 cents × 3 = 420 cents → "4.20 €"                                │
//! │                                                                         │
//! │  The only float → cents conversion happens once, when a catalog        │
//! │  entry is read (`Money::from_major`).                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use till_core::money::Money;
//!
//! let price = Money::from_cents(140); // 1.40 €
//! let line_total = price.multiply_quantity(3);
//! assert_eq!(line_total.cents(), 420);
//! assert_eq!(line_total.to_string(), "4.20");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (euro cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a negative value is representable should a
///   correction ever be recorded
/// - **Saturating arithmetic**: products and sums clamp at the `i64` bounds
///   instead of overflowing, whatever a stored snapshot contains
/// - **Single field tuple struct**: serializes as a bare integer
///
/// ## Where Money is Used
/// ```text
/// ProductCatalogEntry.price ──► CartLine.price ──► SaleEntry.price/total
///                                    │
///                                    └──► brand_subtotal / grand_total
///                                               │
///                                               ▼
///                                    CSV "12.34 €" cells
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount in major units to cents, rounding half away
    /// from zero.
    ///
    /// This is the catalog boundary: product prices arrive as JSON numbers
    /// such as `1.4`. Non-finite input maps to zero; amounts beyond the `i64`
    /// range clamp to its bounds. Range checks belong to
    /// [`crate::validation`].
    ///
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(1.4).cents(), 140);
    /// assert_eq!(Money::from_major(2.675).cents(), 268);
    /// ```
    pub fn from_major(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        // 2.675 * 100.0 == 267.49999999999997; nudge by a sub-cent epsilon so
        // prices typed with two decimals round the way they read.
        let scaled = amount * 100.0;
        let nudged = scaled + scaled.signum() * 1e-6;
        // `as` saturates on out-of-range floats
        Money(nudged.round() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (euros) portion, truncated toward zero.
    #[inline]
    pub const fn euros(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value in major units, for display or interop only.
    #[inline]
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / 100.0
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

    /// Multiplies money by a quantity, clamping at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// assert_eq!(Money::from_cents(i64::MAX).multiply_quantity(2).cents(), i64::MAX);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        // Use i128 so the product itself cannot overflow
        let wide = self.0 as i128 * qty as i128;
        Money(clamp_to_i64(wide))
    }

    /// Adds two amounts, clamping at the `i64` bounds.
    #[inline]
    pub const fn saturating_add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Formats the value with exactly two decimals and a trailing currency
    /// symbol separated by a space: `12.34 €`.
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        format!("{} {}", self, symbol)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain two-decimal rendering (`-5.50`, `0.00`), no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.euros().abs(), self.cents_part())
    }
}

const fn clamp_to_i64(value: i128) -> i64 {
    if value > i64::MAX as i128 {
        i64::MAX
    } else if value < i64::MIN as i128 {
        i64::MIN
    } else {
        value as i64
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Saturating addition, see [`Money::saturating_add`].
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
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
// Serde helper for major-unit JSON numbers
// =============================================================================

/// Serde adapter for fields stored in JSON as a decimal number of euros
/// (`"price": 1.4`) but held in memory as [`Money`].
///
/// ```rust,ignore
/// #[serde(with = "till_core::money::major_units")]
/// pub price: Money,
/// ```
pub mod major_units {
    use super::Money;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(value.to_major())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amount = f64::deserialize(deserializer)?;
        Ok(Money::from_major(amount))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.euros(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_rounds_to_nearest_cent() {
        assert_eq!(Money::from_major(1.4).cents(), 140);
        assert_eq!(Money::from_major(0.1 + 0.2).cents(), 30);
        assert_eq!(Money::from_major(2.675).cents(), 268);
        assert_eq!(Money::from_major(-1.005).cents(), -101);
        assert_eq!(Money::from_major(5.0).cents(), 500);
        assert_eq!(Money::from_major(f64::NAN), Money::zero());
    }

    #[test]
    fn test_from_major_clamps_huge_amounts() {
        assert_eq!(Money::from_major(1e20).cents(), i64::MAX);
        assert_eq!(Money::from_major(-1e20).cents(), i64::MIN);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "-0.05");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_cents(140).format_with_symbol("€"), "1.40 €");
        assert_eq!(Money::from_cents(200000).format_with_symbol("€"), "2000.00 €");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!(a.multiply_quantity(3).cents(), 3000);
        assert_eq!(a.multiply_quantity(0), Money::zero());
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_overflowing() {
        let max = Money::from_cents(i64::MAX);
        assert_eq!(max.multiply_quantity(u32::MAX).cents(), i64::MAX);
        assert_eq!(Money::from_cents(i64::MIN).multiply_quantity(2).cents(), i64::MIN);
        assert_eq!((max + Money::from_cents(1)).cents(), i64::MAX);

        let total: Money = [max, max, Money::from_cents(5)].iter().sum();
        assert_eq!(total.cents(), i64::MAX);
    }

    #[test]
    fn test_sum() {
        let values = [Money::from_cents(100), Money::from_cents(250)];
        let total: Money = values.iter().sum();
        assert_eq!(total.cents(), 350);

        let empty: Vec<Money> = Vec::new();
        assert!(empty.into_iter().sum::<Money>().is_zero());
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_cents(140)).unwrap();
        assert_eq!(json, "140");
    }

    #[test]
    fn test_major_units_adapter() {
        #[derive(Serialize, Deserialize)]
        struct Priced {
            #[serde(with = "major_units")]
            price: Money,
        }

        let parsed: Priced = serde_json::from_str(r#"{"price": 1.4}"#).unwrap();
        assert_eq!(parsed.price.cents(), 140);

        let json = serde_json::to_string(&parsed).unwrap();
        assert_eq!(json, r#"{"price":1.4}"#);
    }
}
