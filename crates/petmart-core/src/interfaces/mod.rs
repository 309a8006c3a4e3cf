// crates/petmart-core/src/interfaces/mod.rs
// ============================================================================
// Module: Petmart Store Interfaces
// Description: Persistence traits for every marketplace aggregate.
// Purpose: Let services run against any backend that honors these contracts.
// Dependencies: crate::core, crate::runtime, thiserror
// ============================================================================

//! ## Overview
//! Stores are synchronous and must be safe to share across threads. Methods
//! that touch several rows (registration completion, checkout, cancellation)
//! are atomic: either every change lands or none does. Business-rule failures
//! discovered inside a transaction surface as [`StoreError::Rejected`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::CartItem;
use crate::core::CartItemId;
use crate::core::CartLine;
use crate::core::Credentials;
use crate::core::DomainError;
use crate::core::ImageId;
use crate::core::NewProduct;
use crate::core::NewReview;
use crate::core::NewStorefront;
use crate::core::Order;
use crate::core::OrderId;
use crate::core::OrderStatus;
use crate::core::PendingRegistration;
use crate::core::Product;
use crate::core::ProductId;
use crate::core::ProductImage;
use crate::core::ProductPage;
use crate::core::ProductPatch;
use crate::core::ProductQuery;
use crate::core::Promotion;
use crate::core::PromotionDraft;
use crate::core::PromotionId;
use crate::core::RatingSummary;
use crate::core::Review;
use crate::core::ReviewId;
use crate::core::ReviewPatch;
use crate::core::SellerOrder;
use crate::core::StoreId;
use crate::core::Storefront;
use crate::core::StorefrontPatch;
use crate::core::Timestamp;
use crate::core::User;
use crate::core::UserId;
use crate::core::UserPatch;
use crate::core::WishlistEntry;
use crate::core::WishlistLine;
use crate::runtime::OrderRequest;
use crate::runtime::OtpPolicy;
use crate::runtime::OtpVerification;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("store io error: {0}")]
    Io(String),
    /// Backend engine error.
    #[error("store db error: {0}")]
    Db(String),
    /// Persisted data failed to decode.
    #[error("store invalid data: {0}")]
    Invalid(String),
    /// Schema version is not supported.
    #[error("store version mismatch: {0}")]
    VersionMismatch(String),
    /// A uniqueness constraint was violated.
    #[error("{0}")]
    Conflict(String),
    /// A record addressed by the call does not exist.
    #[error("{0}")]
    NotFound(String),
    /// A business rule rejected the operation inside a transaction.
    #[error(transparent)]
    Rejected(#[from] DomainError),
}

// ============================================================================
// SECTION: Accounts
// ============================================================================

/// Users, pending registrations, and revoked tokens.
pub trait AccountStore {
    /// Loads a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Loads a user and password hash by normalized email.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn credentials_by_email(&self, email: &str) -> Result<Option<Credentials>, StoreError>;

    /// Applies a profile patch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the user does not exist.
    fn update_user(&self, id: UserId, patch: &UserPatch, at: Timestamp)
    -> Result<User, StoreError>;

    /// Inserts or replaces the pending registration for its email.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn save_pending_registration(&self, pending: &PendingRegistration) -> Result<(), StoreError>;

    /// Loads the pending registration for an email.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn pending_registration(&self, email: &str) -> Result<Option<PendingRegistration>, StoreError>;

    /// Deletes the pending registration for an email.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn delete_pending_registration(&self, email: &str) -> Result<bool, StoreError>;

    /// Checks a submitted code and applies the outcome in one transaction.
    ///
    /// A wrong code persists the incremented attempt count, the final wrong
    /// code discards the registration, and a match creates the user and
    /// removes the registration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the email was registered
    /// meanwhile; the pending registration is left untouched.
    fn verify_pending_registration(
        &self,
        email: &str,
        code: &str,
        policy: &OtpPolicy,
        at: Timestamp,
    ) -> Result<OtpVerification, StoreError>;

    /// Records a revoked token id until it would have expired anyway.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn revoke_token(&self, jti: &str, expires_at: Timestamp) -> Result<(), StoreError>;

    /// Returns true when the token id is revoked. Expired revocations are pruned.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn is_token_revoked(&self, jti: &str, now: Timestamp) -> Result<bool, StoreError>;
}

// ============================================================================
// SECTION: Storefronts
// ============================================================================

/// Seller storefronts.
pub trait StorefrontStore {
    /// Registers a storefront and marks its owner as a seller.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the owner already has a store or
    /// the domain is taken.
    fn create_storefront(
        &self,
        storefront: &NewStorefront,
        at: Timestamp,
    ) -> Result<Storefront, StoreError>;

    /// Loads the storefront owned by a user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn storefront_by_owner(&self, owner: UserId) -> Result<Option<Storefront>, StoreError>;

    /// Loads a storefront by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn storefront_by_id(&self, id: StoreId) -> Result<Option<Storefront>, StoreError>;

    /// Applies a storefront patch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the storefront does not exist.
    fn update_storefront(
        &self,
        id: StoreId,
        patch: &StorefrontPatch,
        at: Timestamp,
    ) -> Result<Storefront, StoreError>;
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Products and product images.
pub trait CatalogStore {
    /// Inserts a product with its initial images.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn create_product(
        &self,
        store: StoreId,
        product: &NewProduct,
        at: Timestamp,
    ) -> Result<Product, StoreError>;

    /// Loads a product with images and promotion.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn product_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Lists a storefront's products, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn products_by_store(&self, store: StoreId) -> Result<Vec<Product>, StoreError>;

    /// Runs a filtered, paginated catalog search.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn search_products(&self, query: &ProductQuery) -> Result<ProductPage, StoreError>;

    /// Applies a product patch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the product does not exist.
    fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
        at: Timestamp,
    ) -> Result<Product, StoreError>;

    /// Deletes a product; order items keep their snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn delete_product(&self, id: ProductId) -> Result<bool, StoreError>;

    /// Attaches an image, enforcing the per-product image limit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] at the image limit and
    /// [`StoreError::NotFound`] for unknown products.
    fn add_product_image(
        &self,
        product: ProductId,
        image_url: &str,
        at: Timestamp,
    ) -> Result<ProductImage, StoreError>;

    /// Removes an image from a product.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn remove_product_image(&self, product: ProductId, image: ImageId) -> Result<bool, StoreError>;
}

// ============================================================================
// SECTION: Promotions
// ============================================================================

/// Store promotions and per-buyer usage.
pub trait PromotionStore {
    /// Inserts a promotion.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn create_promotion(
        &self,
        store: StoreId,
        draft: &PromotionDraft,
        at: Timestamp,
    ) -> Result<Promotion, StoreError>;

    /// Loads a promotion by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn promotion_by_id(&self, id: PromotionId) -> Result<Option<Promotion>, StoreError>;

    /// Lists a storefront's promotions, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn promotions_by_store(&self, store: StoreId) -> Result<Vec<Promotion>, StoreError>;

    /// Replaces a promotion's fields.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the promotion does not exist.
    fn update_promotion(
        &self,
        id: PromotionId,
        draft: &PromotionDraft,
    ) -> Result<Promotion, StoreError>;

    /// Deletes a promotion and unassigns it from products.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn delete_promotion(&self, id: PromotionId) -> Result<bool, StoreError>;

    /// Sets or clears a product's promotion.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the product does not exist.
    fn set_product_promotion(
        &self,
        product: ProductId,
        promotion: Option<PromotionId>,
        at: Timestamp,
    ) -> Result<Product, StoreError>;
}

// ============================================================================
// SECTION: Cart
// ============================================================================

/// Shopping carts.
pub trait CartStore {
    /// Lists a user's cart lines joined with products, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn cart_lines(&self, user: UserId) -> Result<Vec<CartLine>, StoreError>;

    /// Loads one of a user's cart lines.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn cart_item(&self, user: UserId, id: CartItemId) -> Result<Option<CartItem>, StoreError>;

    /// Adds units to the user's line for a product, creating it if needed.
    /// The merged quantity is checked against stock in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] when the merged quantity exceeds
    /// stock and [`StoreError::NotFound`] when the product does not exist.
    fn add_cart_quantity(
        &self,
        user: UserId,
        product: ProductId,
        quantity: u32,
        at: Timestamp,
    ) -> Result<CartItem, StoreError>;

    /// Sets the quantity of a cart line after checking it against stock.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the line does not exist and
    /// [`StoreError::Rejected`] when the quantity exceeds stock.
    fn set_cart_quantity(
        &self,
        id: CartItemId,
        quantity: u32,
        at: Timestamp,
    ) -> Result<CartItem, StoreError>;

    /// Removes one of a user's cart lines.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn remove_cart_item(&self, user: UserId, id: CartItemId) -> Result<bool, StoreError>;

    /// Removes every line in a user's cart and returns the count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn clear_cart(&self, user: UserId) -> Result<u32, StoreError>;
}

// ============================================================================
// SECTION: Orders
// ============================================================================

/// Orders and their lifecycle.
pub trait OrderStore {
    /// Atomically validates, prices, and places an order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] when any line fails a business rule;
    /// nothing is written in that case.
    fn place_order(&self, request: &OrderRequest) -> Result<Order, StoreError>;

    /// Lists a buyer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn orders_for_buyer(&self, buyer: UserId) -> Result<Vec<Order>, StoreError>;

    /// Loads an order with items.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn order_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Lists orders containing a storefront's products, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn orders_for_store(&self, store: StoreId) -> Result<Vec<SellerOrder>, StoreError>;

    /// Atomically moves an order to `next`. Cancelling restores stock and
    /// returns promotion usage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] for disallowed transitions and
    /// [`StoreError::NotFound`] for unknown orders.
    fn transition_order(
        &self,
        id: OrderId,
        next: OrderStatus,
        at: Timestamp,
    ) -> Result<Order, StoreError>;

    /// Returns true when the user has a completed order containing the product.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn has_completed_purchase(&self, user: UserId, product: ProductId)
    -> Result<bool, StoreError>;
}

// ============================================================================
// SECTION: Engagement
// ============================================================================

/// Wishlists and reviews.
pub trait EngagementStore {
    /// Adds a product to a wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] for duplicates.
    fn add_wishlist(
        &self,
        user: UserId,
        product: ProductId,
        at: Timestamp,
    ) -> Result<WishlistEntry, StoreError>;

    /// Lists a user's wishlist joined with products, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn wishlist(&self, user: UserId) -> Result<Vec<WishlistLine>, StoreError>;

    /// Removes a product from a wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn remove_wishlist(&self, user: UserId, product: ProductId) -> Result<bool, StoreError>;

    /// Inserts a review.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the user already reviewed the product.
    fn create_review(&self, review: &NewReview, at: Timestamp) -> Result<Review, StoreError>;

    /// Loads a review by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn review_by_id(&self, id: ReviewId) -> Result<Option<Review>, StoreError>;

    /// Lists a product's reviews, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn reviews_for_product(&self, product: ProductId) -> Result<Vec<Review>, StoreError>;

    /// Computes a product's rating summary.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn rating_summary(&self, product: ProductId) -> Result<RatingSummary, StoreError>;

    /// Applies a review patch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the review does not exist.
    fn update_review(
        &self,
        id: ReviewId,
        patch: &ReviewPatch,
        at: Timestamp,
    ) -> Result<Review, StoreError>;

    /// Deletes a review.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn delete_review(&self, id: ReviewId) -> Result<bool, StoreError>;
}

// ============================================================================
// SECTION: Aggregate
// ============================================================================

/// Full marketplace persistence surface.
pub trait MarketStore:
    AccountStore
    + StorefrontStore
    + CatalogStore
    + PromotionStore
    + CartStore
    + OrderStore
    + EngagementStore
    + Send
    + Sync
{
}

impl<T> MarketStore for T where
    T: AccountStore
        + StorefrontStore
        + CatalogStore
        + PromotionStore
        + CartStore
        + OrderStore
        + EngagementStore
        + Send
        + Sync
{
}
