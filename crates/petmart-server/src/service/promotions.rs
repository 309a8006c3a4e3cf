// crates/petmart-server/src/service/promotions.rs
// ============================================================================
// Module: Promotion Services
// Description: Seller-scoped promotion management and product assignment.
// Purpose: Schedule percentage discounts and attach them to products.
// Dependencies: petmart-core, serde
// ============================================================================

//! Promotion CRUD and product assignment, scoped to the caller's store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petmart_core::DiscountPercent;
use petmart_core::ProductId;
use petmart_core::Promotion;
use petmart_core::PromotionDraft;
use petmart_core::PromotionId;
use petmart_core::PromotionSchedule;
use petmart_core::PromotionStatus;
use petmart_core::Storefront;
use petmart_core::Timestamp;
use petmart_core::UserId;
use petmart_core::error::require_fields;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ApiError;
use crate::service::MarketService;
use crate::service::catalog::ProductView;
use crate::service::present;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Message for unknown promotions.
const PROMOTION_NOT_FOUND: &str = "Promotion not found";

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Promotion create or update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromotionRequest {
    /// Display name.
    pub promotion_name: Option<String>,
    /// Start date, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Start time, `HH:MM`.
    pub start_time: Option<String>,
    /// End date, `YYYY-MM-DD`.
    pub end_date: Option<String>,
    /// End time, `HH:MM`.
    pub end_time: Option<String>,
    /// Discounted units per buyer.
    pub max_quantity: Option<i64>,
    /// Discount percentage.
    pub discount: Option<f64>,
}

/// Assignment request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignPromotionRequest {
    /// Promotion to attach.
    pub promotion_id: Option<i64>,
    /// Target product.
    pub product_id: Option<i64>,
}

/// Unassignment request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnassignPromotionRequest {
    /// Target product.
    pub product_id: Option<i64>,
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Promotion with its status at request time.
#[derive(Debug, Clone, Serialize)]
pub struct PromotionView {
    /// Stored promotion.
    #[serde(flatten)]
    pub promotion: Promotion,
    /// Derived status.
    pub status: PromotionStatus,
    /// True while the promotion window is open.
    pub is_active: bool,
}

impl PromotionView {
    /// Evaluates a promotion at `now`.
    #[must_use]
    pub fn at(promotion: Promotion, now: Timestamp) -> Self {
        let status = promotion.status_at(now);
        Self {
            promotion,
            status,
            is_active: status == PromotionStatus::Active,
        }
    }
}

// ============================================================================
// SECTION: Operations
// ============================================================================

impl MarketService {
    /// Creates a promotion in the caller's storefront.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the caller is not a seller or input is
    /// invalid.
    pub fn create_promotion(
        &self,
        caller: UserId,
        request: &PromotionRequest,
    ) -> Result<PromotionView, ApiError> {
        let storefront = self.seller_store(caller)?;
        let draft = parse_draft(request)?;
        let promotion = self.store.create_promotion(storefront.id, &draft, self.now())?;
        Ok(PromotionView::at(promotion, self.now()))
    }

    /// Lists the caller's promotions.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the caller is not a seller.
    pub fn list_promotions(&self, caller: UserId) -> Result<Vec<PromotionView>, ApiError> {
        let storefront = self.seller_store(caller)?;
        let now = self.now();
        Ok(self
            .store
            .promotions_by_store(storefront.id)?
            .into_iter()
            .map(|promotion| PromotionView::at(promotion, now))
            .collect())
    }

    /// Replaces a promotion's fields.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for missing or foreign promotions and invalid
    /// input.
    pub fn update_promotion(
        &self,
        caller: UserId,
        id: PromotionId,
        request: &PromotionRequest,
    ) -> Result<PromotionView, ApiError> {
        let storefront = self.seller_store(caller)?;
        let promotion = self.owned_promotion(&storefront, id)?;
        let draft = parse_draft(request)?;
        let updated = self.store.update_promotion(promotion.id, &draft)?;
        Ok(PromotionView::at(updated, self.now()))
    }

    /// Deletes a promotion and unassigns it from products.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for missing or foreign promotions.
    pub fn delete_promotion(&self, caller: UserId, id: PromotionId) -> Result<(), ApiError> {
        let storefront = self.seller_store(caller)?;
        let promotion = self.owned_promotion(&storefront, id)?;
        if self.store.delete_promotion(promotion.id)? {
            Ok(())
        } else {
            Err(ApiError::not_found(PROMOTION_NOT_FOUND))
        }
    }

    /// Attaches a promotion to a product of the same storefront.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] with status 404 when either record is missing,
    /// checked before ownership, and 403 when either belongs to another store.
    pub fn assign_promotion(
        &self,
        caller: UserId,
        request: &AssignPromotionRequest,
    ) -> Result<ProductView, ApiError> {
        let storefront = self.seller_store(caller)?;
        require_fields(&[
            ("promotion_id", request.promotion_id.is_some()),
            ("product_id", request.product_id.is_some()),
        ])?;
        let (Some(promotion_id), Some(product_id)) = (request.promotion_id, request.product_id)
        else {
            return Err(ApiError::validation("Missing required fields"));
        };
        let promotion = self
            .store
            .promotion_by_id(PromotionId::new(promotion_id))?
            .ok_or_else(|| ApiError::not_found(PROMOTION_NOT_FOUND))?;
        let product = self.product_or_404(ProductId::new(product_id))?;
        if promotion.store_id != storefront.id {
            return Err(ApiError::forbidden("Unauthorized to modify this promotion"));
        }
        if product.store_id != storefront.id {
            return Err(ApiError::forbidden("Unauthorized to update this product"));
        }
        let updated = self.store.set_product_promotion(product.id, Some(promotion.id), self.now())?;
        Ok(ProductView::at(updated, self.now()))
    }

    /// Clears a product's promotion.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the product is missing or belongs to another
    /// store.
    pub fn unassign_promotion(
        &self,
        caller: UserId,
        request: &UnassignPromotionRequest,
    ) -> Result<ProductView, ApiError> {
        let storefront = self.seller_store(caller)?;
        require_fields(&[("product_id", request.product_id.is_some())])?;
        let Some(product_id) = request.product_id else {
            return Err(ApiError::validation("Missing required fields"));
        };
        let product = self.product_or_404(ProductId::new(product_id))?;
        if product.store_id != storefront.id {
            return Err(ApiError::forbidden("Unauthorized to update this product"));
        }
        let updated = self.store.set_product_promotion(product.id, None, self.now())?;
        Ok(ProductView::at(updated, self.now()))
    }

    /// Loads a promotion belonging to `storefront`.
    fn owned_promotion(
        &self,
        storefront: &Storefront,
        id: PromotionId,
    ) -> Result<Promotion, ApiError> {
        let promotion = self
            .store
            .promotion_by_id(id)?
            .ok_or_else(|| ApiError::not_found(PROMOTION_NOT_FOUND))?;
        if promotion.store_id != storefront.id {
            return Err(ApiError::forbidden("Unauthorized to modify this promotion"));
        }
        Ok(promotion)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a promotion request into a draft.
fn parse_draft(request: &PromotionRequest) -> Result<PromotionDraft, ApiError> {
    let name = present(request.promotion_name.as_deref());
    let start_date = present(request.start_date.as_deref());
    let start_time = present(request.start_time.as_deref());
    let end_date = present(request.end_date.as_deref());
    let end_time = present(request.end_time.as_deref());
    require_fields(&[
        ("promotion_name", name.is_some()),
        ("start_date", start_date.is_some()),
        ("start_time", start_time.is_some()),
        ("end_date", end_date.is_some()),
        ("end_time", end_time.is_some()),
        ("max_quantity", request.max_quantity.is_some()),
        ("discount", request.discount.is_some()),
    ])?;
    let (
        Some(name),
        Some(start_date),
        Some(start_time),
        Some(end_date),
        Some(end_time),
        Some(max_quantity),
        Some(discount),
    ) = (
        name,
        start_date,
        start_time,
        end_date,
        end_time,
        request.max_quantity,
        request.discount,
    )
    else {
        return Err(ApiError::validation("Missing required fields"));
    };
    let max_quantity = u32::try_from(max_quantity)
        .ok()
        .filter(|quantity| *quantity >= 1)
        .ok_or_else(|| ApiError::validation("Max quantity must be at least 1"))?;
    let draft = PromotionDraft {
        name: name.to_string(),
        schedule: PromotionSchedule::parse(start_date, start_time, end_date, end_time)?,
        max_quantity,
        discount_percent: DiscountPercent::from_percent(discount)?,
    };
    draft.validate()?;
    Ok(draft)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test fixtures use explicit unwraps for clarity.")]

    use super::*;

    fn request() -> PromotionRequest {
        PromotionRequest {
            promotion_name: Some("Spring sale".to_string()),
            start_date: Some("2024-03-01".to_string()),
            start_time: Some("08:00".to_string()),
            end_date: Some("2024-03-31".to_string()),
            end_time: Some("20:00".to_string()),
            max_quantity: Some(3),
            discount: Some(15.0),
        }
    }

    #[test]
    fn draft_parses_complete_request() {
        let draft = parse_draft(&request()).unwrap();
        assert_eq!(draft.name, "Spring sale");
        assert_eq!(draft.max_quantity, 3);
        assert_eq!(draft.discount_percent.basis_points(), 1_500);
    }

    #[test]
    fn draft_lists_missing_fields() {
        let err = parse_draft(&PromotionRequest {
            start_time: None,
            discount: None,
            ..request()
        })
        .unwrap_err();
        assert_eq!(err.message, "Missing required fields: start_time, discount");
    }

    #[test]
    fn draft_rejects_inverted_window_and_bad_discount() {
        let inverted = PromotionRequest {
            end_date: Some("2024-02-01".to_string()),
            ..request()
        };
        assert_eq!(parse_draft(&inverted).unwrap_err().message, "Start date must be before end date");
        let too_big = PromotionRequest {
            discount: Some(120.0),
            ..request()
        };
        assert_eq!(
            parse_draft(&too_big).unwrap_err().message,
            "Discount percentage must be between 0 and 100"
        );
        let zero_quantity = PromotionRequest {
            max_quantity: Some(0),
            ..request()
        };
        assert!(parse_draft(&zero_quantity).is_err());
    }
}
