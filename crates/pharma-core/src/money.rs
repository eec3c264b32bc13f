//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Integer Cents
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every price in the catalog, cart and order history is stored as an    │
//! │  integer number of cents:                                              │
//! │                                                                         │
//! │    $12.99  →  Money(1299)                                              │
//! │                                                                         │
//! │  Arithmetic happens in integers; only display formatting converts      │
//! │  back to a decimal string.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pharma_core::money::Money;
//!
//! let price = Money::from_major_minor(12, 99); // $12.99
//! let line = price * 2;                        // $25.98
//! assert_eq!(line.cents(), 2598);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Fields
/// Single `i64` tuple field; signed so refunds and corrections stay
/// representable even though the storefront never produces them today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use pharma_core::money::Money;
    ///
    /// let price = Money::from_cents(1299); // Represents $12.99
    /// assert_eq!(price.cents(), 1299);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Example
    /// ```rust
    /// use pharma_core::money::Money;
    ///
    /// let price = Money::from_major_minor(24, 50); // $24.50
    /// assert_eq!(price.cents(), 2450);
    /// ```
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount, rounding half-up to the nearest cent.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`, in i128 so large
    /// subtotals cannot overflow.
    ///
    /// ## Example
    /// ```rust
    /// use pharma_core::money::Money;
    /// use pharma_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(2497); // $24.97
    /// let rate = TaxRate::from_bps(800);      // 8%
    ///
    /// // $24.97 × 8% = $1.9976 → rounds to $2.00
    /// assert_eq!(subtotal.calculate_tax(rate).cents(), 200);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a line-item quantity.
    ///
    /// ## Example
    /// ```rust
    /// use pharma_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(599); // $5.99
    /// assert_eq!(unit_price.multiply_quantity(2).cents(), 1198);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a plain `$` format.
///
/// ## Note
/// This is for logs and debugging. User-facing display goes through
/// [`crate::types::AppSettings::format_price`], which applies the configured
/// currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Default money is zero.
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

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
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
        let money = Money::from_cents(1299);
        assert_eq!(money.cents(), 1299);
        assert_eq!(money.dollars(), 12);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(24, 50);
        assert_eq!(money.cents(), 2450);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1299)), "$12.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // $24.97 at 8% = $1.9976 → $2.00
        let subtotal = Money::from_cents(2497);
        assert_eq!(subtotal.calculate_tax(TaxRate::from_bps(800)).cents(), 200);

        // $10.00 at 8.25% = $0.825 → $0.83
        let ten = Money::from_cents(1000);
        assert_eq!(ten.calculate_tax(TaxRate::from_bps(825)).cents(), 83);
    }

    #[test]
    fn test_zero_tax_rate() {
        let subtotal = Money::from_cents(2497);
        assert_eq!(subtotal.calculate_tax(TaxRate::zero()).cents(), 0);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(599);
        assert_eq!(unit_price.multiply_quantity(2).cents(), 1198);
    }
}
