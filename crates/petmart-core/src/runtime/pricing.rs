// crates/petmart-core/src/runtime/pricing.rs
// ============================================================================
// Module: Petmart Pricing
// Description: Effective prices and promotion-aware line totals.
// Purpose: Compute what a buyer pays for a quantity of a product.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! A line is split into discounted and full-price units. Discounted units are
//! capped by the buyer's remaining promotion allowance and only exist while
//! the promotion is active.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Money;
use crate::core::Product;
use crate::core::Promotion;
use crate::core::Timestamp;
use crate::core::error::DomainError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Priced order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinePrice {
    /// Undiscounted unit price.
    pub unit_price: Money,
    /// Units priced with the discount.
    pub discounted_units: u32,
    /// Total charged.
    pub line_total: Money,
}

// ============================================================================
// SECTION: Pricing
// ============================================================================

/// Returns the unit price a buyer sees right now.
#[must_use]
pub fn effective_price(product: &Product, now: Timestamp) -> Money {
    match &product.promotion {
        Some(promotion) if promotion.is_active_at(now) => {
            product.price.discounted(promotion.discount_percent)
        }
        _ => product.price,
    }
}

/// Prices `quantity` units given the buyer's prior usage of the promotion.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] when the total overflows.
pub fn price_line(
    unit_price: Money,
    quantity: u32,
    promotion: Option<&Promotion>,
    promotion_used: u32,
    now: Timestamp,
) -> Result<LinePrice, DomainError> {
    let overflow = || DomainError::validation("Order total exceeds the supported range");
    let (discounted_units, discounted_price) = match promotion {
        Some(promotion) if promotion.is_active_at(now) => {
            let units = promotion.remaining_for(promotion_used).min(quantity);
            (units, unit_price.discounted(promotion.discount_percent))
        }
        _ => (0, unit_price),
    };
    let full_units = quantity - discounted_units;
    let discounted_total = discounted_price.checked_mul(discounted_units).ok_or_else(overflow)?;
    let full_total = unit_price.checked_mul(full_units).ok_or_else(overflow)?;
    let line_total = discounted_total.checked_add(full_total).ok_or_else(overflow)?;
    Ok(LinePrice {
        unit_price,
        discounted_units,
        line_total,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test fixtures use explicit unwraps for clarity.")]

    use super::*;
    use crate::core::DiscountPercent;
    use crate::core::PromotionId;
    use crate::core::StoreId;

    fn promotion(max_quantity: u32) -> Promotion {
        Promotion {
            id: PromotionId::new(1),
            store_id: StoreId::new(1),
            name: "Spring sale".to_string(),
            starts_at: Timestamp::from_unix_seconds(100),
            ends_at: Timestamp::from_unix_seconds(200),
            max_quantity,
            discount_percent: DiscountPercent::from_percent(20.0).unwrap(),
            created_at: Timestamp::from_unix_seconds(0),
        }
    }

    #[test]
    fn discount_caps_at_remaining_allowance() {
        let promo = promotion(3);
        let now = Timestamp::from_unix_seconds(150);
        let price = price_line(Money::from_cents(1_000), 5, Some(&promo), 1, now).unwrap();
        assert_eq!(price.discounted_units, 2);
        assert_eq!(price.line_total.cents(), 2 * 800 + 3 * 1_000);
    }

    #[test]
    fn inactive_promotion_charges_full_price() {
        let promo = promotion(3);
        let later = Timestamp::from_unix_seconds(500);
        let price = price_line(Money::from_cents(1_000), 2, Some(&promo), 0, later).unwrap();
        assert_eq!(price.discounted_units, 0);
        assert_eq!(price.line_total.cents(), 2_000);
    }

    #[test]
    fn exhausted_allowance_charges_full_price() {
        let promo = promotion(2);
        let now = Timestamp::from_unix_seconds(150);
        let price = price_line(Money::from_cents(1_000), 2, Some(&promo), 2, now).unwrap();
        assert_eq!(price.discounted_units, 0);
    }
}
