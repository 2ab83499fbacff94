//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  An AP posting must balance TO THE CENT:                                │
//! │    total_inc_gst == total_ex_gst + gst_amount                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    $110.00 inc-GST = 11000 cents → ex_gst() = 10000 cents, exact        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! GST arithmetic lives here so the posting builder never touches raw
//! division: `ex_gst()` removes the 10% component from an inclusive amount
//! (divide by 1.1), `gst()` computes exactly 10% of an exclusive amount.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in integer cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: supplier discounts and credits are negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serde transparent**: serializes as the raw cent count
///
/// Every amount in the reconciliation core flows through this type; the
/// gateway converts to decimal-dollar strings only when building wire
/// payloads for the AP endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole dollars.
    #[inline]
    pub const fn from_dollars(dollars: i64) -> Self {
        Money(dollars * 100)
    }

    /// Parses a decimal-dollar string such as `"110.00"` or `"-5.5"`.
    ///
    /// Scraped invoice amounts arrive as decimal text; parsing to cents here
    /// keeps floats out of the posting math. Returns `None` for anything
    /// that is not a plain decimal number with at most two fraction digits.
    pub fn parse(raw: &str) -> Option<Self> {
        let s = raw.trim().replace(',', "");
        let (sign, s) = match s.strip_prefix('-') {
            Some(rest) => (-1i64, rest.to_string()),
            None => (1i64, s),
        };
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s.as_str(), ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return None;
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || frac.len() > 2 {
            return None;
        }
        if !frac.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let dollars: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().ok()? * 10,
            _ => frac.parse().ok()?,
        };
        Some(Money(sign * (dollars * 100 + cents)))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
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

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Removes the GST component from a GST-inclusive amount.
    ///
    /// Freight and baling/handling charges on a supplier invoice are quoted
    /// inc-GST and must be divided by 1.1 before they become AP detail
    /// lines. Integer form: `cents × 10 / 11`, rounded half-up.
    ///
    /// ## Example
    /// ```rust
    /// use rfms_core::money::Money;
    ///
    /// let freight = Money::from_cents(11000); // $110.00 inc-GST
    /// assert_eq!(freight.ex_gst().cents(), 10000); // $100.00 ex-GST
    /// ```
    pub const fn ex_gst(&self) -> Money {
        // i128 guards against overflow on large invoice totals; the
        // rounding offset carries the sign so credits round symmetrically
        let offset: i128 = if self.0 < 0 { -5 } else { 5 };
        let ex = (self.0 as i128 * 10 + offset) / 11;
        Money(ex as i64)
    }

    /// Computes GST payable as exactly 10% of this ex-GST amount.
    ///
    /// ## Example
    /// ```rust
    /// use rfms_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(10000); // $100.00 ex-GST
    /// assert_eq!(subtotal.gst().cents(), 1000); // $10.00
    /// ```
    pub const fn gst(&self) -> Money {
        let offset: i128 = if self.0 < 0 { -5 } else { 5 };
        let gst = (self.0 as i128 + offset) / 10;
        Money(gst as i64)
    }

    /// Multiplies by a quantity (line total = unit cost × quantity).
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Formats as a plain decimal-dollar string (no currency symbol),
    /// e.g. `"100.00"` / `"-5.50"`. This is the representation the AP
    /// endpoint expects for amounts.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money in a human-readable format. Debug/log output only;
/// wire payloads use [`Money::to_decimal_string`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
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

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
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
