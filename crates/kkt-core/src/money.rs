//! # Money Module
//!
//! Provides the `Money` and `Quantity` types for fiscal arithmetic.
//!
//! ## Why Fixed-Point?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    85.50 × 3 = 256.49999999999997  ❌ WRONG!                            │
//! │                                                                         │
//! │  A fiscalized receipt cannot be corrected after the fact, so a          │
//! │  one-kopeck drift between our total and the register's total is a       │
//! │  legal problem, not a cosmetic one.                                     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    Money    = i64 kopecks        (85.50 → 8550)                         │
//! │    Quantity = i64 thousandths    (2.0   → 2000, 0.125 kg → 125)         │
//! │    Amount   = kopecks × thousandths / 1000, rounded half-up             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kkt_core::money::{Money, Quantity};
//!
//! let price: Money = "85.50".parse().unwrap();
//! let qty = Quantity::from_units(2);
//!
//! let amount = price.multiply_quantity(qty).unwrap();
//! assert_eq!(amount.kopecks(), 17100);
//! assert_eq!(amount.to_string(), "171.00");
//!
//! // NEVER do this:
//! // let bad = Money::from_float(85.5); // NO SUCH METHOD EXISTS!
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;

/// Kopecks per ruble.
const MONEY_SCALE: i64 = 100;

/// Thousandths per unit of quantity (registers accept 3 decimal places).
const QUANTITY_SCALE: i64 = 1000;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in kopecks.
///
/// ## Design Decisions
/// - **i64 (signed)**: change and balance differences can go negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde as decimal string**: `"85.50"` on the wire, never a float
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Largest representable amount.
    pub const MAX: Money = Money(i64::MAX);

    /// Creates a Money value from kopecks (the smallest currency unit).
    #[inline]
    pub const fn from_kopecks(kopecks: i64) -> Self {
        Money(kopecks)
    }

    /// Creates a Money value from rubles and kopecks.
    ///
    /// ```rust
    /// use kkt_core::money::Money;
    ///
    /// assert_eq!(Money::from_rubles_kopecks(216, 0).kopecks(), 21600);
    /// assert_eq!(Money::from_rubles_kopecks(-5, 50).kopecks(), -550);
    /// ```
    #[inline]
    pub const fn from_rubles_kopecks(rubles: i64, kopecks: i64) -> Self {
        if rubles < 0 {
            Money(rubles * MONEY_SCALE - kopecks)
        } else {
            Money(rubles * MONEY_SCALE + kopecks)
        }
    }

    /// Returns the value in kopecks.
    #[inline]
    pub const fn kopecks(&self) -> i64 {
        self.0
    }

    /// Returns the whole-ruble portion.
    #[inline]
    pub const fn rubles(&self) -> i64 {
        self.0 / MONEY_SCALE
    }

    /// Returns the kopeck portion (always 0-99).
    #[inline]
    pub const fn kopecks_part(&self) -> i64 {
        (self.0 % MONEY_SCALE).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a fractional quantity.
    ///
    /// ## Rounding
    /// The product is computed in i128 thousandth-kopecks and rounded
    /// half away from zero to the kopeck, the same way the register
    /// rounds a position sum.
    ///
    /// Returns `None` when the result does not fit in `Money`.
    ///
    /// ```rust
    /// use kkt_core::money::{Money, Quantity};
    ///
    /// let price = Money::from_kopecks(9999);            // 99.99
    /// let weight = Quantity::from_thousandths(125);     // 0.125 kg
    /// // 99.99 × 0.125 = 12.49875 → 12.50
    /// assert_eq!(price.multiply_quantity(weight).unwrap().kopecks(), 1250);
    ///
    /// assert!(Money::MAX.multiply_quantity(Quantity::from_units(2)).is_none());
    /// ```
    pub fn multiply_quantity(&self, qty: Quantity) -> Option<Money> {
        let raw = i128::from(self.0).checked_mul(i128::from(qty.thousandths()))?;
        let half = i128::from(QUANTITY_SCALE / 2);
        let scale = i128::from(QUANTITY_SCALE);
        let rounded = if raw >= 0 {
            (raw + half) / scale
        } else {
            (raw - half) / scale
        };
        i64::try_from(rounded).ok().map(Money)
    }

    /// Adds, returning `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Adds, clamping at [`Money::MAX`].
    #[inline]
    pub fn saturating_add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }

    /// Sums an iterator, returning `None` on overflow.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(values: I) -> Option<Money> {
        values
            .into_iter()
            .try_fold(Money::zero(), |acc, value| acc.checked_add(value))
    }

    /// Subtracts, clamping at zero (used for change due).
    #[inline]
    pub fn saturating_sub(&self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.rubles().abs(), self.kopecks_part())
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    /// Parses `"216"`, `"85.5"`, `"85.50"`. More than two decimals is rejected
    /// rather than silently rounded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed(s, 2).map(Money).map_err(|reason| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason,
        })
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

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(FixedVisitor { scale: MONEY_SCALE, digits: 2 })
            .map(Money)
    }
}

// =============================================================================
// Quantity Type
// =============================================================================

/// A position quantity in thousandths of a unit.
///
/// Registers accept quantities with three decimal places (weighed goods),
/// so `1.0` is stored as `1000` and `0.125` as `125`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(i64);

impl Quantity {
    #[inline]
    pub const fn from_thousandths(thousandths: i64) -> Self {
        Quantity(thousandths)
    }

    /// Whole units: `Quantity::from_units(2)` is `2.000`.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * QUANTITY_SCALE)
    }

    #[inline]
    pub const fn thousandths(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::from_units(1)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:03}", sign, abs / QUANTITY_SCALE, abs % QUANTITY_SCALE)
    }
}

impl FromStr for Quantity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed(s, 3).map(Quantity).map_err(|reason| ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason,
        })
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_any(FixedVisitor { scale: QUANTITY_SCALE, digits: 3 })
            .map(Quantity)
    }
}

// =============================================================================
// Fixed-Point Parsing
// =============================================================================

/// Parses a decimal string into an integer scaled by `10^digits`.
fn parse_fixed(input: &str, digits: usize) -> Result<i64, String> {
    let s = input.trim();
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let (whole, frac) = match body.split_once('.') {
        Some((w, f)) => (w, f),
        None => (body, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(format!("'{}' is not a number", input));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("'{}' is not a decimal number", input));
    }
    if frac.len() > digits {
        return Err(format!("at most {} decimal places allowed, got '{}'", digits, input));
    }

    let scale = 10_i64.pow(digits as u32);
    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| format!("'{}' is out of range", input))?
    };
    let frac_value: i64 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = digits);
        padded.parse().map_err(|_| format!("'{}' is not a decimal number", input))?
    };

    let value = whole_value
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(|| format!("'{}' is out of range", input))?;

    Ok(if negative { -value } else { value })
}

/// Accepts decimal strings and integers (whole units); rejects floats.
struct FixedVisitor {
    scale: i64,
    digits: usize,
}

impl<'de> Visitor<'de> for FixedVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a decimal string with at most {} places or an integer", self.digits)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        parse_fixed(v, self.digits).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        v.checked_mul(self.scale)
            .ok_or_else(|| E::custom("value out of range"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(self.scale))
            .ok_or_else(|| E::custom("value out of range"))
    }

    fn visit_f64<E: de::Error>(self, _v: f64) -> Result<i64, E> {
        Err(E::custom(
            "floating-point amounts are not accepted, send a decimal string such as \"85.50\"",
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
