// crates/petmart-core/src/lib.rs
// ============================================================================
// Module: Petmart Core Library
// Description: Public API surface for the Petmart domain core.
// Purpose: Expose domain records, runtime helpers, and store interfaces.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Petmart core holds the marketplace domain: accounts, storefronts, the pet
//! supply catalog, promotions, carts, orders, wishlists, and reviews. It owns
//! every validation rule and pricing decision so that storage backends and
//! transports only move already-checked values. The core never reads the
//! wall clock directly; callers supply a [`Clock`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::AccountStore;
pub use interfaces::CartStore;
pub use interfaces::CatalogStore;
pub use interfaces::EngagementStore;
pub use interfaces::MarketStore;
pub use interfaces::OrderStore;
pub use interfaces::PromotionStore;
pub use interfaces::StoreError;
pub use interfaces::StorefrontStore;
pub use runtime::CheckoutLine;
pub use runtime::LinePrice;
pub use runtime::OrderRequest;
pub use runtime::OtpCheck;
pub use runtime::OtpPolicy;
pub use runtime::OtpVerification;
pub use runtime::PlannedLine;
pub use runtime::effective_price;
pub use runtime::merge_lines;
pub use runtime::plan_line;
pub use runtime::price_line;
