// crates/petmart-core/src/core/order.rs
// ============================================================================
// Module: Petmart Orders
// Description: Order records and the order status lifecycle.
// Purpose: Keep order state changes within the allowed transitions.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Orders start `Pending`, may move to `Processing` and then `Completed`, and
//! may be `Cancelled` from either non-terminal state. `Completed` and
//! `Cancelled` are terminal. Order items keep a snapshot of the product name
//! and price so history survives product deletion.
//!
//! ## Invariants
//! - `Order::total_price` equals the sum of its item line totals.
//! - `OrderItem::discounted_units <= OrderItem::quantity`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::clock::Timestamp;
use crate::core::error::DomainError;
use crate::core::identifiers::OrderId;
use crate::core::identifiers::OrderItemId;
use crate::core::identifiers::ProductId;
use crate::core::identifiers::PromotionId;
use crate::core::identifiers::StoreId;
use crate::core::identifiers::UserId;
use crate::core::money::Money;

// ============================================================================
// SECTION: Status
// ============================================================================

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Placed, awaiting the seller.
    Pending,
    /// Being prepared or shipped.
    Processing,
    /// Delivered; terminal.
    Completed,
    /// Cancelled; terminal.
    Cancelled,
}

impl OrderStatus {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Parses a label case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true for terminal states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Checks whether the order may move from `self` to `next`.
    ///
    /// Returns `Ok(false)` when `next == self` (a no-op) and `Ok(true)` when a
    /// change must be applied.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] for disallowed transitions.
    pub fn check_transition(self, next: Self) -> Result<bool, DomainError> {
        if self == next {
            return Ok(false);
        }
        match (self, next) {
            (Self::Pending, Self::Processing | Self::Cancelled)
            | (Self::Processing, Self::Completed | Self::Cancelled) => Ok(true),
            (Self::Completed, Self::Cancelled) => {
                Err(DomainError::validation("Completed orders cannot be cancelled"))
            }
            (from, to) => {
                Err(DomainError::Validation(format!("Invalid status transition from {from} to {to}")))
            }
        }
    }

    /// Checks a buyer-initiated cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] when the order is already terminal.
    pub fn check_cancellation(self) -> Result<(), DomainError> {
        match self {
            Self::Completed => Err(DomainError::validation("Completed orders cannot be cancelled")),
            Self::Cancelled => Err(DomainError::validation("Order is already cancelled")),
            Self::Pending | Self::Processing => Ok(()),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Records
// ============================================================================

/// Order line snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Line identifier.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Product, or `None` when the product has since been deleted.
    pub product_id: Option<ProductId>,
    /// Storefront that sold the product.
    pub store_id: StoreId,
    /// Product name at purchase time.
    pub product_name: String,
    /// Units purchased.
    pub quantity: u32,
    /// Undiscounted unit price at purchase time.
    pub unit_price: Money,
    /// Units priced with the promotion discount.
    pub discounted_units: u32,
    /// Total charged for the line.
    pub line_total: Money,
    /// Promotion applied to the discounted units.
    pub promotion_id: Option<PromotionId>,
}

/// Buyer order with items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: OrderId,
    /// Buyer.
    pub buyer_id: UserId,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Sum of line totals.
    pub total_price: Money,
    /// Placement time.
    pub created_at: Timestamp,
    /// Last status change.
    pub updated_at: Timestamp,
    /// Order lines.
    pub items: Vec<OrderItem>,
}

/// Order as seen by one seller: only that seller's lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellerOrder {
    /// Order identifier.
    pub order_id: OrderId,
    /// Buyer.
    pub buyer_id: UserId,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Full order total.
    pub total_price: Money,
    /// Total of this seller's lines.
    pub seller_subtotal: Money,
    /// Placement time.
    pub created_at: Timestamp,
    /// This seller's lines.
    pub items: Vec<OrderItem>,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
