// crates/petmart-core/src/core/mod.rs
// ============================================================================
// Module: Petmart Core Types
// Description: Canonical marketplace records and validation rules.
// Purpose: Provide stable, serializable types shared by stores and transports.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Core types are the single source of truth for the HTTP surface and the
//! storage schema. Constructors and `validate` helpers reject malformed input
//! before it reaches a store.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod account;
pub mod cart;
pub mod catalog;
pub mod clock;
pub mod engagement;
pub mod error;
pub mod identifiers;
pub mod money;
pub mod order;
pub mod promotion;
pub mod storefront;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use account::Credentials;
pub use account::NewUser;
pub use account::PendingRegistration;
pub use account::PublicProfile;
pub use account::User;
pub use account::UserPatch;
pub use cart::CartItem;
pub use cart::CartLine;
pub use catalog::AnimalType;
pub use catalog::Category;
pub use catalog::NewProduct;
pub use catalog::Product;
pub use catalog::ProductImage;
pub use catalog::ProductPage;
pub use catalog::ProductPatch;
pub use catalog::ProductQuery;
pub use catalog::ProductSort;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use clock::Timestamp;
pub use engagement::NewReview;
pub use engagement::Rating;
pub use engagement::RatingSummary;
pub use engagement::Review;
pub use engagement::ReviewPatch;
pub use engagement::WishlistEntry;
pub use engagement::WishlistLine;
pub use error::DomainError;
pub use identifiers::CartItemId;
pub use identifiers::ImageId;
pub use identifiers::OrderId;
pub use identifiers::OrderItemId;
pub use identifiers::ProductId;
pub use identifiers::PromotionId;
pub use identifiers::ReviewId;
pub use identifiers::StoreId;
pub use identifiers::UserId;
pub use identifiers::WishlistId;
pub use money::DiscountPercent;
pub use money::Money;
pub use order::Order;
pub use order::OrderItem;
pub use order::OrderStatus;
pub use order::SellerOrder;
pub use promotion::Promotion;
pub use promotion::PromotionDraft;
pub use promotion::PromotionSchedule;
pub use promotion::PromotionStatus;
pub use storefront::NewStorefront;
pub use storefront::Storefront;
pub use storefront::StorefrontPatch;
pub use storefront::StorefrontStatus;
