// crates/petmart-server/src/service/engagement.rs
// ============================================================================
// Module: Engagement Services
// Description: Wishlists and product reviews.
// Purpose: Let buyers save products and review completed purchases.
// Dependencies: petmart-core, serde, serde_json
// ============================================================================

//! Wishlist entries and reviews. Reviews require a completed purchase.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petmart_core::NewReview;
use petmart_core::ProductId;
use petmart_core::Rating;
use petmart_core::Review;
use petmart_core::ReviewId;
use petmart_core::ReviewPatch;
use petmart_core::UserId;
use petmart_core::WishlistEntry;
use petmart_core::WishlistLine;
use petmart_core::engagement::validate_review_text;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::service::MarketService;
use crate::service::NO_INPUT_MESSAGE;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Message for out-of-range or non-integer ratings.
const RATING_INVALID: &str = "Rating must be between 1 and 5";
/// Message for reviews the caller cannot change.
const REVIEW_NOT_OWNED: &str = "Review not found or not authorized";

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Wishlist add request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WishlistRequest {
    /// Product to save.
    pub product_id: Option<i64>,
}

/// Review creation request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateReviewRequest {
    /// Reviewed product.
    pub product_id: Option<i64>,
    /// Star rating, kept raw so non-integers get a rating error.
    pub rating: Option<Value>,
    /// Optional text.
    pub review: Option<String>,
}

/// Review update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReviewRequest {
    /// New star rating.
    pub rating: Option<Value>,
    /// New text.
    pub review: Option<String>,
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Reviews of one product with their aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct ProductReviews {
    /// Reviews, newest first.
    pub reviews: Vec<Review>,
    /// Mean rating rounded to two decimals.
    pub average: f64,
    /// Number of reviews.
    pub count: u32,
}

// ============================================================================
// SECTION: Wishlist Operations
// ============================================================================

impl MarketService {
    /// Saves a product to the caller's wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for missing ids, unknown products, and duplicates.
    pub fn add_to_wishlist(
        &self,
        caller: UserId,
        request: &WishlistRequest,
    ) -> Result<WishlistEntry, ApiError> {
        let product_id = request
            .product_id
            .map(ProductId::new)
            .ok_or_else(|| ApiError::validation("Product ID is required"))?;
        let product = self.product_or_404(product_id)?;
        Ok(self.store.add_wishlist(caller, product.id, self.now())?)
    }

    /// Lists the caller's wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the store fails.
    pub fn wishlist(&self, caller: UserId) -> Result<Vec<WishlistLine>, ApiError> {
        Ok(self.store.wishlist(caller)?)
    }

    /// Removes a product from the caller's wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] with status 404 when the product is not saved.
    pub fn remove_from_wishlist(&self, caller: UserId, product: ProductId) -> Result<(), ApiError> {
        if self.store.remove_wishlist(caller, product)? {
            Ok(())
        } else {
            Err(ApiError::not_found("Product not found in wishlist"))
        }
    }
}

// ============================================================================
// SECTION: Review Operations
// ============================================================================

impl MarketService {
    /// Reviews a product the caller bought and received.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for invalid ratings, unknown products, missing
    /// completed purchases, and duplicate reviews.
    pub fn create_review(
        &self,
        caller: UserId,
        request: &CreateReviewRequest,
    ) -> Result<Review, ApiError> {
        let product_id = request
            .product_id
            .map(ProductId::new)
            .ok_or_else(|| ApiError::validation("Product ID is required"))?;
        let rating = parse_rating(request.rating.as_ref())?;
        let review =
            request.review.as_deref().map(validate_review_text).transpose()?.flatten();
        let product = self.product_or_404(product_id)?;
        if !self.store.has_completed_purchase(caller, product.id)? {
            return Err(ApiError::forbidden(
                "You can only review products you have purchased and completed",
            ));
        }
        let draft = NewReview {
            user_id: caller,
            product_id: product.id,
            rating,
            review,
        };
        Ok(self.store.create_review(&draft, self.now())?)
    }

    /// Lists a product's reviews with their aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] with status 404 for unknown products.
    pub fn product_reviews(&self, product: ProductId) -> Result<ProductReviews, ApiError> {
        let product = self.product_or_404(product)?;
        let reviews = self.store.reviews_for_product(product.id)?;
        let summary = self.store.rating_summary(product.id)?;
        Ok(ProductReviews {
            reviews,
            average: summary.average,
            count: summary.count,
        })
    }

    /// Returns one review.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] with status 404 for unknown reviews.
    pub fn review(&self, id: ReviewId) -> Result<Review, ApiError> {
        self.store.review_by_id(id)?.ok_or_else(|| ApiError::not_found("Review not found"))
    }

    /// Updates one of the caller's reviews.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for foreign reviews and empty or invalid updates.
    pub fn update_review(
        &self,
        caller: UserId,
        id: ReviewId,
        request: &UpdateReviewRequest,
    ) -> Result<Review, ApiError> {
        let review = self.owned_review(caller, id)?;
        let patch = ReviewPatch {
            rating: request.rating.as_ref().map(|value| parse_rating(Some(value))).transpose()?,
            review: request.review.as_deref().map(validate_review_text).transpose()?,
        };
        if patch.is_empty() {
            return Err(ApiError::validation(NO_INPUT_MESSAGE));
        }
        Ok(self.store.update_review(review.id, &patch, self.now())?)
    }

    /// Deletes one of the caller's reviews.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] with status 404 for foreign or missing reviews.
    pub fn delete_review(&self, caller: UserId, id: ReviewId) -> Result<(), ApiError> {
        let review = self.owned_review(caller, id)?;
        if self.store.delete_review(review.id)? {
            Ok(())
        } else {
            Err(ApiError::not_found(REVIEW_NOT_OWNED))
        }
    }

    /// Loads a review written by `caller`.
    fn owned_review(&self, caller: UserId, id: ReviewId) -> Result<Review, ApiError> {
        self.store
            .review_by_id(id)?
            .filter(|review| review.user_id == caller)
            .ok_or_else(|| ApiError::not_found(REVIEW_NOT_OWNED))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a raw JSON rating.
fn parse_rating(value: Option<&Value>) -> Result<Rating, ApiError> {
    value
        .and_then(Value::as_i64)
        .ok_or_else(|| ApiError::validation(RATING_INVALID))
        .and_then(|stars| Ok(Rating::new(stars)?))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
