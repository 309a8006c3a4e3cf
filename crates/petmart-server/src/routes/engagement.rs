// crates/petmart-server/src/routes/engagement.rs
// ============================================================================
// Module: Engagement Routes
// Description: Wishlist and review endpoints.
// Purpose: Expose wishlist and review services.
// Dependencies: axum
// ============================================================================

//! Wishlist and review handlers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use petmart_core::ProductId;
use petmart_core::Review;
use petmart_core::ReviewId;
use petmart_core::WishlistEntry;
use petmart_core::WishlistLine;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::error::ApiSuccess;
use crate::routes::ApiJson;
use crate::routes::ApiPath;
use crate::routes::run_blocking;
use crate::service::MarketService;
use crate::service::engagement::CreateReviewRequest;
use crate::service::engagement::ProductReviews;
use crate::service::engagement::UpdateReviewRequest;
use crate::service::engagement::WishlistRequest;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Wishlist and review routes.
pub(super) fn routes() -> Router<Arc<MarketService>> {
    Router::new()
        .route("/wishlist", post(add_to_wishlist).get(wishlist))
        .route("/wishlist/{product_id}", delete(remove_from_wishlist))
        .route("/reviews", post(create_review))
        .route("/reviews/{id}", get(review).put(update_review).delete(delete_review))
        .route("/products/{id}/reviews", get(product_reviews))
}

// ============================================================================
// SECTION: Wishlist Handlers
// ============================================================================

/// `POST /wishlist`
async fn add_to_wishlist(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiJson(request): ApiJson<WishlistRequest>,
) -> ApiResult<WishlistEntry> {
    let entry = run_blocking(|| service.add_to_wishlist(caller.id, &request))?;
    Ok(ApiSuccess::created("Product added to wishlist", entry))
}

/// `GET /wishlist`
async fn wishlist(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
) -> ApiResult<Vec<WishlistLine>> {
    let lines = run_blocking(|| service.wishlist(caller.id))?;
    Ok(ApiSuccess::ok("Wishlist", lines))
}

/// `DELETE /wishlist/{product_id}`
async fn remove_from_wishlist(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiPath(product_id): ApiPath<i64>,
) -> ApiResult<()> {
    run_blocking(|| service.remove_from_wishlist(caller.id, ProductId::new(product_id)))?;
    Ok(ApiSuccess::ok("Product removed from wishlist", ()))
}

// ============================================================================
// SECTION: Review Handlers
// ============================================================================

/// `POST /reviews`
async fn create_review(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiJson(request): ApiJson<CreateReviewRequest>,
) -> ApiResult<Review> {
    let review = run_blocking(|| service.create_review(caller.id, &request))?;
    Ok(ApiSuccess::created("Review created successfully", review))
}

/// `GET /products/{id}/reviews`
async fn product_reviews(
    State(service): State<Arc<MarketService>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<ProductReviews> {
    let reviews = run_blocking(|| service.product_reviews(ProductId::new(id)))?;
    Ok(ApiSuccess::ok("Product reviews", reviews))
}

/// `GET /reviews/{id}`
async fn review(
    State(service): State<Arc<MarketService>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Review> {
    let review = run_blocking(|| service.review(ReviewId::new(id)))?;
    Ok(ApiSuccess::ok("Review details", review))
}

/// `PUT /reviews/{id}`
async fn update_review(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateReviewRequest>,
) -> ApiResult<Review> {
    let review = run_blocking(|| service.update_review(caller.id, ReviewId::new(id), &request))?;
    Ok(ApiSuccess::ok("Review updated successfully", review))
}

/// `DELETE /reviews/{id}`
async fn delete_review(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    run_blocking(|| service.delete_review(caller.id, ReviewId::new(id)))?;
    Ok(ApiSuccess::ok("Review deleted successfully", ()))
}
