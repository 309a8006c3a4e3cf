// crates/petmart-server/src/service/cart.rs
// ============================================================================
// Module: Cart Services
// Description: Shopping cart lines with stock checks and live pricing.
// Purpose: Collect products before checkout.
// Dependencies: petmart-core, serde
// ============================================================================

//! Cart lines priced at the current effective price.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petmart_core::CartItem;
use petmart_core::CartItemId;
use petmart_core::Money;
use petmart_core::Product;
use petmart_core::ProductId;
use petmart_core::Timestamp;
use petmart_core::UserId;
use petmart_core::effective_price;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ApiError;
use crate::service::MarketService;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Message for missing or foreign cart lines.
const ITEM_NOT_FOUND: &str = "Item not found in cart";

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Add-to-cart request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddToCartRequest {
    /// Product to add.
    pub product_id: Option<i64>,
    /// Units to add; defaults to 1.
    pub quantity: Option<i64>,
}

/// Cart line update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCartRequest {
    /// New quantity.
    pub quantity: Option<i64>,
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// One cart line with product pricing.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    /// Cart item id.
    pub id: CartItemId,
    /// Product id.
    pub product_id: ProductId,
    /// Units in the cart.
    pub quantity: u32,
    /// Product name.
    pub name: String,
    /// Listed unit price.
    pub price: Money,
    /// Unit price after the active promotion.
    pub effective_price: Money,
    /// First product image.
    pub image_url: Option<String>,
    /// Units currently in stock.
    pub stock: u32,
    /// `effective_price × quantity`.
    pub line_total: Money,
}

/// Cart contents.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    /// Lines, oldest first.
    pub items: Vec<CartLineView>,
    /// Sum of line totals.
    pub subtotal: Money,
}

// ============================================================================
// SECTION: Operations
// ============================================================================

impl MarketService {
    /// Adds units of a product to the caller's cart.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for invalid quantities, unknown or own products,
    /// and quantities above stock.
    pub fn add_to_cart(
        &self,
        caller: UserId,
        request: &AddToCartRequest,
    ) -> Result<CartItem, ApiError> {
        let invalid = || ApiError::validation("Product ID and quantity must be valid");
        let product_id = request.product_id.map(ProductId::new).ok_or_else(invalid)?;
        let quantity = positive_quantity(request.quantity.unwrap_or(1)).ok_or_else(invalid)?;
        let product = self.product_or_404(product_id)?;
        if let Some(storefront) = self.store.storefront_by_owner(caller)?
            && storefront.id == product.store_id
        {
            return Err(ApiError::validation("You cannot add your own product to the cart"));
        }
        Ok(self.store.add_cart_quantity(caller, product.id, quantity, self.now())?)
    }

    /// Returns the caller's cart with live prices.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the store fails or a total overflows.
    pub fn cart(&self, caller: UserId) -> Result<CartView, ApiError> {
        let now = self.now();
        let mut items = Vec::new();
        let mut subtotal = Money::ZERO;
        for line in self.store.cart_lines(caller)? {
            let view = line_view(line.item, &line.product, now)?;
            subtotal = subtotal.checked_add(view.line_total).ok_or_else(ApiError::internal)?;
            items.push(view);
        }
        Ok(CartView {
            items,
            subtotal,
        })
    }

    /// Sets the quantity of one of the caller's cart lines.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for invalid quantities, foreign lines, and
    /// quantities above stock.
    pub fn update_cart_item(
        &self,
        caller: UserId,
        id: CartItemId,
        request: &UpdateCartRequest,
    ) -> Result<CartItem, ApiError> {
        let quantity = request
            .quantity
            .and_then(positive_quantity)
            .ok_or_else(|| ApiError::validation("Quantity must be at least 1"))?;
        let item = self
            .store
            .cart_item(caller, id)?
            .ok_or_else(|| ApiError::not_found(ITEM_NOT_FOUND))?;
        Ok(self.store.set_cart_quantity(item.id, quantity, self.now())?)
    }

    /// Removes one of the caller's cart lines.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] with status 404 for foreign or missing lines.
    pub fn remove_cart_item(&self, caller: UserId, id: CartItemId) -> Result<(), ApiError> {
        if self.store.remove_cart_item(caller, id)? {
            Ok(())
        } else {
            Err(ApiError::not_found(ITEM_NOT_FOUND))
        }
    }

    /// Empties the caller's cart and returns the number of removed lines.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the store fails.
    pub fn clear_cart(&self, caller: UserId) -> Result<u32, ApiError> {
        Ok(self.store.clear_cart(caller)?)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a requested quantity to a positive unit count.
fn positive_quantity(quantity: i64) -> Option<u32> {
    u32::try_from(quantity).ok().filter(|quantity| *quantity >= 1)
}

/// Prices one cart line.
fn line_view(
    item: CartItem,
    product: &Product,
    now: Timestamp,
) -> Result<CartLineView, ApiError> {
    let unit = effective_price(product, now);
    let line_total = unit.checked_mul(item.quantity).ok_or_else(ApiError::internal)?;
    Ok(CartLineView {
        id: item.id,
        product_id: item.product_id,
        quantity: item.quantity,
        name: product.name.clone(),
        price: product.price,
        effective_price: unit,
        image_url: product.primary_image().map(str::to_string),
        stock: product.stock,
        line_total,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantities_must_be_positive() {
        assert_eq!(positive_quantity(3), Some(3));
        assert_eq!(positive_quantity(0), None);
        assert_eq!(positive_quantity(-2), None);
        assert_eq!(positive_quantity(i64::MAX), None);
    }
}
