// crates/petmart-server/src/routes/seller.rs
// ============================================================================
// Module: Seller Routes
// Description: Storefront, product, promotion, and fulfilment endpoints.
// Purpose: Expose seller-only services under /seller and /promotions.
// Dependencies: axum
// ============================================================================

//! Seller-only handlers. Every route resolves the caller's storefront first.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use petmart_core::ImageId;
use petmart_core::OrderId;
use petmart_core::ProductId;
use petmart_core::ProductImage;
use petmart_core::PromotionId;
use petmart_core::SellerOrder;
use petmart_core::Storefront;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::error::ApiSuccess;
use crate::routes::ApiJson;
use crate::routes::ApiPath;
use crate::routes::run_blocking;
use crate::service::MarketService;
use crate::service::catalog::AddImageRequest;
use crate::service::catalog::CreateProductRequest;
use crate::service::catalog::ProductView;
use crate::service::catalog::UpdateProductRequest;
use crate::service::orders::OrderStatusRequest;
use crate::service::orders::OrderView;
use crate::service::promotions::AssignPromotionRequest;
use crate::service::promotions::PromotionRequest;
use crate::service::promotions::PromotionView;
use crate::service::promotions::UnassignPromotionRequest;
use crate::service::storefronts::RegisterStoreRequest;
use crate::service::storefronts::UpdateStoreRequest;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Seller and promotion routes.
pub(super) fn routes() -> Router<Arc<MarketService>> {
    Router::new()
        .route("/seller/register", post(register_store))
        .route("/seller/store", get(my_store).put(update_store))
        .route("/seller/products", post(create_product).get(my_products))
        .route("/seller/products/{id}", put(update_product).delete(delete_product))
        .route("/seller/products/{id}/images", post(add_product_image))
        .route("/seller/products/{id}/images/{image_id}", delete(remove_product_image))
        .route("/seller/orders", get(seller_orders))
        .route("/seller/orders/{id}/status", put(update_order_status))
        .route("/promotions", post(create_promotion).get(list_promotions))
        .route("/promotions/assign", post(assign_promotion))
        .route("/promotions/unassign", post(unassign_promotion))
        .route("/promotions/{id}", put(update_promotion).delete(delete_promotion))
}

// ============================================================================
// SECTION: Storefront Handlers
// ============================================================================

/// `POST /seller/register`
async fn register_store(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiJson(request): ApiJson<RegisterStoreRequest>,
) -> ApiResult<Storefront> {
    let storefront = run_blocking(|| service.register_store(caller.id, &request))?;
    Ok(ApiSuccess::created("Store registered successfully", storefront))
}

/// `GET /seller/store`
async fn my_store(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
) -> ApiResult<Storefront> {
    let storefront = run_blocking(|| service.my_store(caller.id))?;
    Ok(ApiSuccess::ok("Store details", storefront))
}

/// `PUT /seller/store`
async fn update_store(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiJson(request): ApiJson<UpdateStoreRequest>,
) -> ApiResult<Storefront> {
    let storefront = run_blocking(|| service.update_store(caller.id, &request))?;
    Ok(ApiSuccess::ok("Store updated successfully", storefront))
}

// ============================================================================
// SECTION: Product Handlers
// ============================================================================

/// `POST /seller/products`
async fn create_product(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiJson(request): ApiJson<CreateProductRequest>,
) -> ApiResult<ProductView> {
    let product = run_blocking(|| service.create_product(caller.id, &request))?;
    Ok(ApiSuccess::created("Product created successfully", product))
}

/// `GET /seller/products`
async fn my_products(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
) -> ApiResult<Vec<ProductView>> {
    let products = run_blocking(|| service.my_products(caller.id))?;
    Ok(ApiSuccess::ok("Store products", products))
}

/// `PUT /seller/products/{id}`
async fn update_product(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateProductRequest>,
) -> ApiResult<ProductView> {
    let product =
        run_blocking(|| service.update_product(caller.id, ProductId::new(id), &request))?;
    Ok(ApiSuccess::ok("Product updated successfully", product))
}

/// `DELETE /seller/products/{id}`
async fn delete_product(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    run_blocking(|| service.delete_product(caller.id, ProductId::new(id)))?;
    Ok(ApiSuccess::ok("Product deleted successfully", ()))
}

/// `POST /seller/products/{id}/images`
async fn add_product_image(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<AddImageRequest>,
) -> ApiResult<ProductImage> {
    let image =
        run_blocking(|| service.add_product_image(caller.id, ProductId::new(id), &request))?;
    Ok(ApiSuccess::created("Image added successfully", image))
}

/// `DELETE /seller/products/{id}/images/{image_id}`
async fn remove_product_image(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiPath((id, image_id)): ApiPath<(i64, i64)>,
) -> ApiResult<()> {
    run_blocking(|| {
        service.remove_product_image(caller.id, ProductId::new(id), ImageId::new(image_id))
    })?;
    Ok(ApiSuccess::ok("Image removed successfully", ()))
}

// ============================================================================
// SECTION: Fulfilment Handlers
// ============================================================================

/// `GET /seller/orders`
async fn seller_orders(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
) -> ApiResult<Vec<SellerOrder>> {
    let orders = run_blocking(|| service.seller_orders(caller.id))?;
    Ok(ApiSuccess::ok("Store orders", orders))
}

/// `PUT /seller/orders/{id}/status`
async fn update_order_status(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<OrderStatusRequest>,
) -> ApiResult<OrderView> {
    let order =
        run_blocking(|| service.update_order_status(caller.id, OrderId::new(id), &request))?;
    Ok(ApiSuccess::ok("Order status updated", order))
}

// ============================================================================
// SECTION: Promotion Handlers
// ============================================================================

/// `POST /promotions`
async fn create_promotion(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiJson(request): ApiJson<PromotionRequest>,
) -> ApiResult<PromotionView> {
    let promotion = run_blocking(|| service.create_promotion(caller.id, &request))?;
    Ok(ApiSuccess::created("Promotion created successfully", promotion))
}

/// `GET /promotions`
async fn list_promotions(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
) -> ApiResult<Vec<PromotionView>> {
    let promotions = run_blocking(|| service.list_promotions(caller.id))?;
    Ok(ApiSuccess::ok("Store promotions", promotions))
}

/// `PUT /promotions/{id}`
async fn update_promotion(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<PromotionRequest>,
) -> ApiResult<PromotionView> {
    let promotion =
        run_blocking(|| service.update_promotion(caller.id, PromotionId::new(id), &request))?;
    Ok(ApiSuccess::ok("Promotion updated successfully", promotion))
}

/// `DELETE /promotions/{id}`
async fn delete_promotion(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    run_blocking(|| service.delete_promotion(caller.id, PromotionId::new(id)))?;
    Ok(ApiSuccess::ok("Promotion deleted successfully", ()))
}

/// `POST /promotions/assign`
async fn assign_promotion(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiJson(request): ApiJson<AssignPromotionRequest>,
) -> ApiResult<ProductView> {
    let product = run_blocking(|| service.assign_promotion(caller.id, &request))?;
    Ok(ApiSuccess::ok("Promotion assigned to product", product))
}

/// `POST /promotions/unassign`
async fn unassign_promotion(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiJson(request): ApiJson<UnassignPromotionRequest>,
) -> ApiResult<ProductView> {
    let product = run_blocking(|| service.unassign_promotion(caller.id, &request))?;
    Ok(ApiSuccess::ok("Promotion removed from product", product))
}
