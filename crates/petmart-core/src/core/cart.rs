// crates/petmart-core/src/core/cart.rs
// ============================================================================
// Module: Petmart Cart
// Description: Shopping cart records.
// Purpose: Hold a buyer's pending selections before checkout.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A cart holds at most one line per (user, product); adding the same product
//! again increases the existing line's quantity.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::catalog::Product;
use crate::core::clock::Timestamp;
use crate::core::identifiers::CartItemId;
use crate::core::identifiers::ProductId;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Cart line as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Line identifier.
    pub id: CartItemId,
    /// Owning user.
    pub user_id: UserId,
    /// Selected product.
    pub product_id: ProductId,
    /// Selected quantity (at least 1).
    pub quantity: u32,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
}

/// Cart line joined with its product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Stored line.
    pub item: CartItem,
    /// Product snapshot at read time.
    pub product: Product,
}
