// crates/petmart-server/src/routes/catalog.rs
// ============================================================================
// Module: Catalog Routes
// Description: Public product browsing endpoints.
// Purpose: Expose catalog search and product detail under /products.
// Dependencies: axum
// ============================================================================

//! Public catalog handlers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use petmart_core::ProductId;

use crate::error::ApiResult;
use crate::error::ApiSuccess;
use crate::routes::ApiPath;
use crate::routes::ApiQuery;
use crate::routes::run_blocking;
use crate::service::MarketService;
use crate::service::catalog::ProductDetail;
use crate::service::catalog::ProductListParams;
use crate::service::catalog::ProductListView;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Public catalog routes.
pub(super) fn routes() -> Router<Arc<MarketService>> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/category/{category}", get(products_by_category))
        .route("/products/animal/{animal}", get(products_by_animal))
        .route("/products/{id}", get(get_product))
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `GET /products`
async fn list_products(
    State(service): State<Arc<MarketService>>,
    ApiQuery(params): ApiQuery<ProductListParams>,
) -> ApiResult<ProductListView> {
    let page = run_blocking(|| service.list_products(&params))?;
    Ok(ApiSuccess::ok("Products", page))
}

/// `GET /products/category/{category}`
async fn products_by_category(
    State(service): State<Arc<MarketService>>,
    ApiPath(category): ApiPath<String>,
    ApiQuery(params): ApiQuery<ProductListParams>,
) -> ApiResult<ProductListView> {
    let page = run_blocking(|| service.products_by_category(&category, &params))?;
    Ok(ApiSuccess::ok("Products", page))
}

/// `GET /products/animal/{animal}`
async fn products_by_animal(
    State(service): State<Arc<MarketService>>,
    ApiPath(animal): ApiPath<String>,
    ApiQuery(params): ApiQuery<ProductListParams>,
) -> ApiResult<ProductListView> {
    let page = run_blocking(|| service.products_by_animal(&animal, &params))?;
    Ok(ApiSuccess::ok("Products", page))
}

/// `GET /products/{id}`
async fn get_product(
    State(service): State<Arc<MarketService>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ProductDetail> {
    let product = run_blocking(|| service.get_product(ProductId::new(id)))?;
    Ok(ApiSuccess::ok("Product details", product))
}
