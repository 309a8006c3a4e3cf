// crates/petmart-core/src/runtime/checkout.rs
// ============================================================================
// Module: Petmart Checkout Planning
// Description: Validation and pricing of checkout lines against loaded products.
// Purpose: Decide each line's outcome before a store applies it atomically.
// Dependencies: crate::core, crate::runtime::pricing
// ============================================================================

//! ## Overview
//! Checkout runs in two phases. [`merge_lines`] normalizes the request
//! (positive quantities, one line per product). Inside the store transaction,
//! [`plan_line`] checks ownership and stock for each product and prices the
//! line. Any error aborts the whole order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;

use crate::core::Money;
use crate::core::Product;
use crate::core::ProductId;
use crate::core::PromotionId;
use crate::core::StoreId;
use crate::core::Timestamp;
use crate::core::UserId;
use crate::core::error::DomainError;
use crate::runtime::pricing::price_line;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum distinct products in one order.
pub const MAX_ORDER_LINES: usize = 100;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Requested product and quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CheckoutLine {
    /// Requested product.
    pub product_id: ProductId,
    /// Requested units.
    pub quantity: u32,
}

/// Everything a store needs to place an order atomically.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    /// Buyer.
    pub buyer_id: UserId,
    /// Buyer's own storefront, used to reject self-purchases.
    pub buyer_store: Option<StoreId>,
    /// Merged lines.
    pub lines: Vec<CheckoutLine>,
    /// Remove the purchased products from the buyer's cart.
    pub clear_cart: bool,
    /// Placement time.
    pub placed_at: Timestamp,
}

/// Line that passed every check, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLine {
    /// Product.
    pub product_id: ProductId,
    /// Selling storefront.
    pub store_id: StoreId,
    /// Product name snapshot.
    pub product_name: String,
    /// Units purchased.
    pub quantity: u32,
    /// Undiscounted unit price.
    pub unit_price: Money,
    /// Discounted units.
    pub discounted_units: u32,
    /// Line total.
    pub line_total: Money,
    /// Promotion applied when any units were discounted.
    pub promotion_id: Option<PromotionId>,
    /// Stock after the purchase.
    pub remaining_stock: u32,
}

// ============================================================================
// SECTION: Planning
// ============================================================================

/// Validates quantities and merges duplicate products, keeping first-seen order.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] for empty requests, zero quantities,
/// too many products, or quantity overflow.
pub fn merge_lines(lines: &[CheckoutLine]) -> Result<Vec<CheckoutLine>, DomainError> {
    if lines.is_empty() {
        return Err(DomainError::validation("Products are required"));
    }
    let mut merged: Vec<CheckoutLine> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.quantity == 0 {
            return Err(DomainError::validation("Each item must have product_id and quantity"));
        }
        if let Some(existing) =
            merged.iter_mut().find(|existing| existing.product_id == line.product_id)
        {
            existing.quantity = existing.quantity.checked_add(line.quantity).ok_or_else(|| {
                DomainError::validation("Requested quantity exceeds the supported range")
            })?;
        } else {
            merged.push(*line);
        }
    }
    if merged.len() > MAX_ORDER_LINES {
        return Err(DomainError::Validation(format!(
            "An order may contain at most {MAX_ORDER_LINES} products"
        )));
    }
    Ok(merged)
}

/// Checks ownership and stock for one line and prices it.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] for self-purchases, insufficient stock,
/// or total overflow.
pub fn plan_line(
    buyer_store: Option<StoreId>,
    product: &Product,
    quantity: u32,
    promotion_used: u32,
    now: Timestamp,
) -> Result<PlannedLine, DomainError> {
    if buyer_store == Some(product.store_id) {
        return Err(DomainError::Validation(format!(
            "You cannot purchase your own product: {}",
            product.name
        )));
    }
    if product.stock < quantity {
        return Err(DomainError::Validation(format!(
            "Product ID {} is not available or has insufficient stock",
            product.id
        )));
    }
    let price = price_line(product.price, quantity, product.promotion.as_ref(), promotion_used, now)?;
    let promotion_id = if price.discounted_units > 0 {
        product.promotion.as_ref().map(|promotion| promotion.id)
    } else {
        None
    };
    Ok(PlannedLine {
        product_id: product.id,
        store_id: product.store_id,
        product_name: product.name.clone(),
        quantity,
        unit_price: price.unit_price,
        discounted_units: price.discounted_units,
        line_total: price.line_total,
        promotion_id,
        remaining_stock: product.stock - quantity,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
