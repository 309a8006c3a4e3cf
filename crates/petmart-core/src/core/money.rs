// crates/petmart-core/src/core/money.rs
// ============================================================================
// Module: Petmart Money
// Description: Fixed-point prices and discount percentages.
// Purpose: Avoid float drift in prices, totals, and promotion discounts.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Prices are stored as whole cents in [`Money`] and discounts as basis points
//! in [`DiscountPercent`]. Both accept JSON numbers with at most two decimal
//! places and serialize back to JSON numbers. Discounts round half-up to the
//! nearest cent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use crate::core::error::DomainError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Largest accepted price in cents (one billion whole units).
pub const MAX_PRICE_CENTS: i64 = 100_000_000_000;
/// Basis points representing 100%.
const FULL_PERCENT_BPS: u32 = 10_000;
/// Absolute tolerance when checking for at most two fractional digits.
const DECIMAL_EPSILON: f64 = 1e-6;
/// Relative tolerance (in ulps) for large magnitudes.
const DECIMAL_ULPS: f64 = 4.0;

// ============================================================================
// SECTION: Money
// ============================================================================

/// Non-negative amount of money in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from whole cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Parses a decimal amount with at most two fractional digits.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for negative, non-finite, too
    /// precise, or out-of-range values.
    pub fn from_decimal(value: f64) -> Result<Self, DomainError> {
        let cents = decimal_to_hundredths(value, "Amount")?;
        if cents > MAX_PRICE_CENTS {
            return Err(DomainError::validation("Amount exceeds the supported range"));
        }
        Ok(Self(cents))
    }

    /// Returns the amount as a decimal number.
    #[must_use]
    pub fn as_decimal(self) -> f64 {
        hundredths_to_decimal(self.0)
    }

    /// Multiplies by a quantity, returning `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    /// Adds two amounts, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Applies a percentage discount, rounding half-up to the nearest cent.
    #[must_use]
    pub fn discounted(self, discount: DiscountPercent) -> Self {
        let keep = i128::from(FULL_PERCENT_BPS - discount.basis_points());
        let scaled = i128::from(self.0) * keep + i128::from(FULL_PERCENT_BPS / 2);
        let cents = scaled / i128::from(FULL_PERCENT_BPS);
        Self(i64::try_from(cents).unwrap_or(self.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::from_decimal(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Discount Percent
// ============================================================================

/// Discount percentage in the half-open range (0, 100], held as basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DiscountPercent(u32);

impl DiscountPercent {
    /// Creates a discount from basis points (1% = 100).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] unless `0 < bps <= 10_000`.
    pub fn from_basis_points(bps: u32) -> Result<Self, DomainError> {
        if bps == 0 || bps > FULL_PERCENT_BPS {
            return Err(DomainError::validation("Discount percentage must be between 0 and 100"));
        }
        Ok(Self(bps))
    }

    /// Parses a decimal percentage such as `12.5`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] when out of range or too precise.
    pub fn from_percent(value: f64) -> Result<Self, DomainError> {
        let hundredths = decimal_to_hundredths(value, "Discount percentage")
            .map_err(|_| DomainError::validation("Discount percentage must be between 0 and 100"))?;
        let bps = u32::try_from(hundredths)
            .map_err(|_| DomainError::validation("Discount percentage must be between 0 and 100"))?;
        Self::from_basis_points(bps)
    }

    /// Returns the discount in basis points.
    #[must_use]
    pub const fn basis_points(self) -> u32 {
        self.0
    }

    /// Returns the discount as a decimal percentage.
    #[must_use]
    pub fn as_percent(self) -> f64 {
        hundredths_to_decimal(i64::from(self.0))
    }
}

impl Serialize for DiscountPercent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_percent())
    }
}

impl<'de> Deserialize<'de> for DiscountPercent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Self::from_percent(value).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a decimal with at most two fractional digits into hundredths.
fn decimal_to_hundredths(value: f64, label: &str) -> Result<i64, DomainError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::Validation(format!("{label} must be a non-negative number")));
    }
    let scaled = value * 100.0;
    let rounded = scaled.round();
    let tolerance = DECIMAL_EPSILON.max(scaled.abs() * f64::EPSILON * DECIMAL_ULPS);
    if (scaled - rounded).abs() > tolerance {
        return Err(DomainError::Validation(format!(
            "{label} must have at most two decimal places"
        )));
    }
    #[allow(
        clippy::cast_precision_loss,
        reason = "Comparison bound only; exactness is not required."
    )]
    let limit = i64::MAX as f64;
    if rounded >= limit {
        return Err(DomainError::Validation(format!("{label} exceeds the supported range")));
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Value is finite, non-negative, integral, and below i64::MAX."
    )]
    let hundredths = rounded as i64;
    Ok(hundredths)
}

/// Converts hundredths back into a decimal number.
fn hundredths_to_decimal(hundredths: i64) -> f64 {
    #[allow(
        clippy::cast_precision_loss,
        reason = "Prices stay far below 2^53 cents so the conversion is exact."
    )]
    let value = hundredths as f64;
    value / 100.0
}

// ============================================================================
// SECTION: Tests
// ============================================================================
