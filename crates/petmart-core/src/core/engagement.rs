// crates/petmart-core/src/core/engagement.rs
// ============================================================================
// Module: Petmart Engagement
// Description: Wishlists, product reviews, and rating summaries.
// Purpose: Capture buyer interest and post-purchase feedback.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Wishlist entries and reviews are unique per (user, product). Reviews carry a
//! [`Rating`] from 1 to 5 and may only be written after a completed purchase;
//! that rule is enforced by the service layer against order history.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::clock::Timestamp;
use crate::core::error::DomainError;
use crate::core::identifiers::ProductId;
use crate::core::identifiers::ReviewId;
use crate::core::identifiers::UserId;
use crate::core::identifiers::WishlistId;
use crate::core::money::Money;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum review text length.
pub const MAX_REVIEW_LENGTH: usize = 2_000;

// ============================================================================
// SECTION: Wishlist
// ============================================================================

/// Wishlist entry as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    /// Entry identifier.
    pub id: WishlistId,
    /// Owning user.
    pub user_id: UserId,
    /// Wished product.
    pub product_id: ProductId,
    /// Creation time.
    pub created_at: Timestamp,
}

/// Wishlist entry joined with product details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WishlistLine {
    /// Entry identifier.
    pub wishlist_id: WishlistId,
    /// Wished product.
    pub product_id: ProductId,
    /// Product name.
    pub product_name: String,
    /// Product price.
    pub product_price: Money,
    /// Product image URLs.
    pub product_images: Vec<String>,
    /// Time the entry was added.
    pub added_at: Timestamp,
}

// ============================================================================
// SECTION: Reviews
// ============================================================================

/// Star rating between 1 and 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Validates a rating.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] outside 1..=5.
    pub fn new(value: i64) -> Result<Self, DomainError> {
        match u8::try_from(value) {
            Ok(stars @ 1 ..= 5) => Ok(Self(stars)),
            _ => Err(DomainError::validation("Rating must be between 1 and 5")),
        }
    }

    /// Returns the number of stars.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Product review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Review identifier.
    pub id: ReviewId,
    /// Author.
    pub user_id: UserId,
    /// Author display name.
    pub reviewer_name: String,
    /// Reviewed product.
    pub product_id: ProductId,
    /// Star rating.
    pub rating: Rating,
    /// Optional review text.
    pub review: Option<String>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
}

/// Input for a new review.
#[derive(Debug, Clone)]
pub struct NewReview {
    /// Author.
    pub user_id: UserId,
    /// Reviewed product.
    pub product_id: ProductId,
    /// Star rating.
    pub rating: Rating,
    /// Optional review text.
    pub review: Option<String>,
}

/// Partial review update.
#[derive(Debug, Clone, Default)]
pub struct ReviewPatch {
    /// New rating.
    pub rating: Option<Rating>,
    /// New review text; `Some(None)` clears it.
    pub review: Option<Option<String>>,
}

impl ReviewPatch {
    /// Returns true when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rating.is_none() && self.review.is_none()
    }
}

/// Aggregate rating for a product.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    /// Mean rating rounded to two decimals; zero without reviews.
    pub average: f64,
    /// Number of reviews.
    pub count: u32,
}

impl RatingSummary {
    /// Builds a summary from a star total and review count.
    #[must_use]
    pub fn from_totals(star_total: u64, count: u32) -> Self {
        if count == 0 {
            return Self {
                average: 0.0,
                count,
            };
        }
        // Hundredths, rounded half-up.
        let hundredths = (star_total * 200 + u64::from(count)) / (2 * u64::from(count));
        #[allow(
            clippy::cast_precision_loss,
            reason = "Hundredths of a 1-5 rating are tiny and exact in f64."
        )]
        let average = hundredths as f64 / 100.0;
        Self {
            average,
            count,
        }
    }
}

/// Validates review text. Blank text means no text.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] when too long.
pub fn validate_review_text(text: &str) -> Result<Option<String>, DomainError> {
    let trimmed = text.trim();
    if trimmed.chars().count() > MAX_REVIEW_LENGTH {
        return Err(DomainError::Validation(format!(
            "Review must be at most {MAX_REVIEW_LENGTH} characters"
        )));
    }
    Ok(Some(trimmed.to_string()).filter(|text| !text.is_empty()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::float_cmp,
        reason = "Test fixtures compare exact rounded values."
    )]

    use super::*;

    #[test]
    fn rating_bounds() {
        assert_eq!(Rating::new(5).unwrap().get(), 5);
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[test]
    fn blank_review_text_means_none() {
        assert_eq!(validate_review_text("  Tasty  ").unwrap().as_deref(), Some("Tasty"));
        assert_eq!(validate_review_text("   ").unwrap(), None);
        assert!(validate_review_text(&"x".repeat(MAX_REVIEW_LENGTH + 1)).is_err());
    }

    #[test]
    fn summary_rounds_half_up() {
        assert_eq!(RatingSummary::from_totals(0, 0).average, 0.0);
        assert_eq!(RatingSummary::from_totals(14, 3).average, 4.67);
        assert_eq!(RatingSummary::from_totals(9, 2).average, 4.5);
    }
}
