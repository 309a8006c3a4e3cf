// crates/petmart-server/src/routes/shopping.rs
// ============================================================================
// Module: Shopping Routes
// Description: Cart and buyer order endpoints.
// Purpose: Expose cart and checkout services under /cart and /orders.
// Dependencies: axum, serde_json
// ============================================================================

//! Cart and buyer order handlers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use petmart_core::CartItem;
use petmart_core::CartItemId;
use petmart_core::OrderId;
use serde_json::Value;
use serde_json::json;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::error::ApiSuccess;
use crate::routes::ApiJson;
use crate::routes::ApiPath;
use crate::routes::run_blocking;
use crate::service::MarketService;
use crate::service::cart::AddToCartRequest;
use crate::service::cart::CartView;
use crate::service::cart::UpdateCartRequest;
use crate::service::orders::CheckoutRequest;
use crate::service::orders::OrderSummary;
use crate::service::orders::OrderView;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Cart and order routes.
pub(super) fn routes() -> Router<Arc<MarketService>> {
    Router::new()
        .route("/cart", get(cart).delete(clear_cart))
        .route("/cart/items", post(add_to_cart))
        .route("/cart/items/{id}", put(update_cart_item).delete(remove_cart_item))
        .route("/orders", get(orders))
        .route("/orders/checkout", post(checkout))
        .route("/orders/{id}", get(order))
        .route("/orders/{id}/cancel", post(cancel_order))
}

// ============================================================================
// SECTION: Cart Handlers
// ============================================================================

/// `POST /cart/items`
async fn add_to_cart(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiJson(request): ApiJson<AddToCartRequest>,
) -> ApiResult<CartItem> {
    let item = run_blocking(|| service.add_to_cart(caller.id, &request))?;
    Ok(ApiSuccess::created("Product added to cart", item))
}

/// `GET /cart`
async fn cart(State(service): State<Arc<MarketService>>, caller: AuthUser) -> ApiResult<CartView> {
    let cart = run_blocking(|| service.cart(caller.id))?;
    Ok(ApiSuccess::ok("Cart contents", cart))
}

/// `PUT /cart/items/{id}`
async fn update_cart_item(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateCartRequest>,
) -> ApiResult<CartItem> {
    let item =
        run_blocking(|| service.update_cart_item(caller.id, CartItemId::new(id), &request))?;
    Ok(ApiSuccess::ok("Cart item updated", item))
}

/// `DELETE /cart/items/{id}`
async fn remove_cart_item(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    run_blocking(|| service.remove_cart_item(caller.id, CartItemId::new(id)))?;
    Ok(ApiSuccess::ok("Item removed from cart", ()))
}

/// `DELETE /cart`
async fn clear_cart(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
) -> ApiResult<Value> {
    let removed = run_blocking(|| service.clear_cart(caller.id))?;
    Ok(ApiSuccess::ok("Cart cleared", json!({ "removed": removed })))
}

// ============================================================================
// SECTION: Order Handlers
// ============================================================================

/// `POST /orders/checkout`
async fn checkout(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> ApiResult<OrderView> {
    let order = run_blocking(|| service.checkout(caller.id, &request))?;
    Ok(ApiSuccess::created("Order placed successfully", order))
}

/// `GET /orders`
async fn orders(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
) -> ApiResult<Vec<OrderSummary>> {
    let orders = run_blocking(|| service.orders(caller.id))?;
    Ok(ApiSuccess::ok("Order history", orders))
}

/// `GET /orders/{id}`
async fn order(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<OrderView> {
    let order = run_blocking(|| service.order(caller.id, OrderId::new(id)))?;
    Ok(ApiSuccess::ok("Order details", order))
}

/// `POST /orders/{id}/cancel`
async fn cancel_order(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<OrderView> {
    let order = run_blocking(|| service.cancel_order(caller.id, OrderId::new(id)))?;
    Ok(ApiSuccess::ok("Order cancelled successfully", order))
}
