// crates/petmart-core/src/core/identifiers.rs
// ============================================================================
// Module: Petmart Identifiers
// Description: Strongly typed row identifiers for marketplace records.
// Purpose: Prevent mixing user, product, order, and other keys at compile time.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every persisted record is keyed by a store-assigned `i64`. Each record kind
//! gets its own transparent newtype so a `ProductId` can never be passed where
//! an `OrderId` is expected. Identifiers serialize as bare JSON numbers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Macro
// ============================================================================

/// Declares a transparent `i64` identifier newtype.
macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw row identifier.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw row identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self::new(value)
            }
        }
    };
}

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

row_id!(
    /// Registered user identifier.
    UserId
);
row_id!(
    /// Seller storefront identifier.
    StoreId
);
row_id!(
    /// Catalog product identifier.
    ProductId
);
row_id!(
    /// Product image identifier.
    ImageId
);
row_id!(
    /// Promotion identifier.
    PromotionId
);
row_id!(
    /// Cart line identifier.
    CartItemId
);
row_id!(
    /// Order identifier.
    OrderId
);
row_id!(
    /// Order line identifier.
    OrderItemId
);
row_id!(
    /// Wishlist entry identifier.
    WishlistId
);
row_id!(
    /// Product review identifier.
    ReviewId
);

// ============================================================================
// SECTION: Tests
// ============================================================================
