// crates/petmart-server/src/service/orders.rs
// ============================================================================
// Module: Order Services
// Description: Checkout, buyer order history, cancellation, seller fulfilment.
// Purpose: Turn carts or explicit product lists into orders and drive their
//          lifecycle.
// Dependencies: petmart-core, serde
// ============================================================================

//! ## Overview
//! Checkout validates the request shape here and leaves stock, pricing,
//! promotion usage, and cart cleanup to a single store transaction. Buyers
//! only ever see their own orders; other orders answer 404. Sellers see and
//! update orders that contain at least one of their products.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petmart_core::CheckoutLine;
use petmart_core::Money;
use petmart_core::Order;
use petmart_core::OrderId;
use petmart_core::OrderItem;
use petmart_core::OrderRequest;
use petmart_core::OrderStatus;
use petmart_core::ProductId;
use petmart_core::SellerOrder;
use petmart_core::Timestamp;
use petmart_core::UserId;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ApiError;
use crate::service::MarketService;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Message for missing or foreign orders.
const ORDER_NOT_FOUND: &str = "Order not found";
/// Message for checkouts without lines.
const PRODUCTS_REQUIRED: &str = "Products are required";
/// Message for malformed checkout lines.
const LINE_INVALID: &str = "Each item must have product_id and quantity";

// ============================================================================
// SECTION: Requests
// ============================================================================

/// One requested checkout line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutItemRequest {
    /// Product to buy.
    pub product_id: Option<i64>,
    /// Units to buy.
    pub quantity: Option<i64>,
}

/// Checkout request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutRequest {
    /// Explicit product lines.
    pub products: Option<Vec<CheckoutItemRequest>>,
    /// Check out the caller's cart instead.
    pub from_cart: Option<bool>,
}

/// Seller status update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderStatusRequest {
    /// Target status label.
    pub status: Option<String>,
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Buyer-facing order with items.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    /// Order id.
    pub order_id: OrderId,
    /// Current status.
    pub status: OrderStatus,
    /// Order total.
    pub total_price: Money,
    /// Placement time.
    pub created_at: Timestamp,
    /// Last status change.
    pub updated_at: Timestamp,
    /// Line snapshots.
    pub items: Vec<OrderItem>,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id,
            status: order.status,
            total_price: order.total_price,
            created_at: order.created_at,
            updated_at: order.updated_at,
            items: order.items,
        }
    }
}

/// Order history entry.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSummary {
    /// Order id.
    pub order_id: OrderId,
    /// Current status.
    pub status: OrderStatus,
    /// Order total.
    pub total_price: Money,
    /// Placement time.
    pub created_at: Timestamp,
    /// Number of lines.
    pub item_count: usize,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            status: order.status,
            total_price: order.total_price,
            created_at: order.created_at,
            item_count: order.items.len(),
        }
    }
}

// ============================================================================
// SECTION: Buyer Operations
// ============================================================================

impl MarketService {
    /// Places an order from explicit lines or the caller's cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for malformed requests and for any line that
    /// fails stock, ownership, or existence checks. Nothing is written when
    /// a line fails.
    pub fn checkout(&self, caller: UserId, request: &CheckoutRequest) -> Result<OrderView, ApiError> {
        let from_cart = request.from_cart.unwrap_or(false);
        let explicit = request.products.as_deref().unwrap_or_default();
        let lines = match (from_cart, explicit.is_empty()) {
            (true, false) => {
                return Err(ApiError::validation(
                    "Provide either products or from_cart, not both",
                ));
            }
            (true, true) => self
                .store
                .cart_lines(caller)?
                .into_iter()
                .map(|line| CheckoutLine {
                    product_id: line.item.product_id,
                    quantity: line.item.quantity,
                })
                .collect(),
            (false, _) => explicit.iter().map(checkout_line).collect::<Result<Vec<_>, _>>()?,
        };
        if lines.is_empty() {
            return Err(ApiError::validation(PRODUCTS_REQUIRED));
        }
        let buyer_store = self.store.storefront_by_owner(caller)?.map(|storefront| storefront.id);
        let order = self.store.place_order(&OrderRequest {
            buyer_id: caller,
            buyer_store,
            lines,
            clear_cart: from_cart,
            placed_at: self.now(),
        })?;
        Ok(order.into())
    }

    /// Lists the caller's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the store fails.
    pub fn orders(&self, caller: UserId) -> Result<Vec<OrderSummary>, ApiError> {
        Ok(self.store.orders_for_buyer(caller)?.iter().map(OrderSummary::from).collect())
    }

    /// Returns one of the caller's orders.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] with status 404 for missing or foreign orders.
    pub fn order(&self, caller: UserId, id: OrderId) -> Result<OrderView, ApiError> {
        Ok(self.buyer_order(caller, id)?.into())
    }

    /// Cancels one of the caller's orders and releases its stock.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for foreign orders and orders already completed
    /// or cancelled.
    pub fn cancel_order(&self, caller: UserId, id: OrderId) -> Result<OrderView, ApiError> {
        let order = self.buyer_order(caller, id)?;
        order.status.check_cancellation()?;
        Ok(self.store.transition_order(order.id, OrderStatus::Cancelled, self.now())?.into())
    }

    /// Loads an order placed by `caller`.
    fn buyer_order(&self, caller: UserId, id: OrderId) -> Result<Order, ApiError> {
        self.store
            .order_by_id(id)?
            .filter(|order| order.buyer_id == caller)
            .ok_or_else(|| ApiError::not_found(ORDER_NOT_FOUND))
    }
}

// ============================================================================
// SECTION: Seller Operations
// ============================================================================

impl MarketService {
    /// Lists orders containing the caller's products.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the caller is not a seller.
    pub fn seller_orders(&self, caller: UserId) -> Result<Vec<SellerOrder>, ApiError> {
        let storefront = self.seller_store(caller)?;
        Ok(self.store.orders_for_store(storefront.id)?)
    }

    /// Moves an order containing the caller's products to a new status.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for unknown statuses, orders without the caller's
    /// products, and disallowed transitions.
    pub fn update_order_status(
        &self,
        caller: UserId,
        id: OrderId,
        request: &OrderStatusRequest,
    ) -> Result<OrderView, ApiError> {
        let storefront = self.seller_store(caller)?;
        let next = request
            .status
            .as_deref()
            .and_then(OrderStatus::parse)
            .ok_or_else(|| ApiError::validation("Invalid status"))?;
        let order = self
            .store
            .order_by_id(id)?
            .filter(|order| order.items.iter().any(|item| item.store_id == storefront.id))
            .ok_or_else(|| ApiError::not_found(ORDER_NOT_FOUND))?;
        Ok(self.store.transition_order(order.id, next, self.now())?.into())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates one requested line.
fn checkout_line(item: &CheckoutItemRequest) -> Result<CheckoutLine, ApiError> {
    let (Some(product_id), Some(quantity)) = (item.product_id, item.quantity) else {
        return Err(ApiError::validation(LINE_INVALID));
    };
    let quantity = u32::try_from(quantity)
        .ok()
        .filter(|quantity| *quantity >= 1)
        .ok_or_else(|| ApiError::validation(LINE_INVALID))?;
    Ok(CheckoutLine {
        product_id: ProductId::new(product_id),
        quantity,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test fixtures use explicit unwraps for clarity.")]

    use super::*;

    #[test]
    fn checkout_lines_require_id_and_positive_quantity() {
        let ok = checkout_line(&CheckoutItemRequest {
            product_id: Some(4),
            quantity: Some(2),
        })
        .unwrap();
        assert_eq!(ok.product_id, ProductId::new(4));
        assert_eq!(ok.quantity, 2);
        for bad in [
            CheckoutItemRequest {
                product_id: None,
                quantity: Some(1),
            },
            CheckoutItemRequest {
                product_id: Some(1),
                quantity: Some(0),
            },
            CheckoutItemRequest {
                product_id: Some(1),
                quantity: None,
            },
        ] {
            assert_eq!(checkout_line(&bad).unwrap_err().message, LINE_INVALID);
        }
    }
}
