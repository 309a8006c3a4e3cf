// crates/petmart-store-sqlite/src/promotions.rs
// ============================================================================
// Module: SQLite Promotion Store
// Description: Store promotions, product assignment, and per-buyer usage.
// Purpose: Implement PromotionStore over the shared SQLite connection.
// Dependencies: petmart-core, rusqlite
// ============================================================================

//! Promotion rows and product assignment.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petmart_core::Product;
use petmart_core::ProductId;
use petmart_core::Promotion;
use petmart_core::PromotionDraft;
use petmart_core::PromotionId;
use petmart_core::PromotionStore;
use petmart_core::StoreError;
use petmart_core::StoreId;
use petmart_core::Timestamp;
use rusqlite::params;

use crate::rows::PROMOTION_COLUMNS;
use crate::rows::load_promotion;
use crate::rows::map_promotion;
use crate::rows::require_product;
use crate::store::SqliteMarketStore;
use crate::store::db_error;

// ============================================================================
// SECTION: PromotionStore
// ============================================================================

impl PromotionStore for SqliteMarketStore {
    fn create_promotion(
        &self,
        store: StoreId,
        draft: &PromotionDraft,
        at: Timestamp,
    ) -> Result<Promotion, StoreError> {
        draft.validate()?;
        self.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO promotions (store_id, name, starts_at, ends_at, max_quantity, \
                 discount_bps, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    store.get(),
                    draft.name,
                    draft.schedule.starts_at.as_unix_seconds(),
                    draft.schedule.ends_at.as_unix_seconds(),
                    draft.max_quantity,
                    draft.discount_percent.basis_points(),
                    at.as_unix_seconds()
                ],
            )
            .map_err(|err| db_error(&err))?;
            let id = PromotionId::new(tx.last_insert_rowid());
            load_promotion(tx, id)?
                .ok_or_else(|| StoreError::Db("inserted promotion missing".to_string()))
        })
    }

    fn promotion_by_id(&self, id: PromotionId) -> Result<Option<Promotion>, StoreError> {
        self.with_connection(|connection| load_promotion(connection, id))
    }

    fn promotions_by_store(&self, store: StoreId) -> Result<Vec<Promotion>, StoreError> {
        self.with_connection(|connection| {
            let mut stmt = connection
                .prepare(&format!(
                    "SELECT {PROMOTION_COLUMNS} FROM promotions WHERE store_id = ?1
                     ORDER BY created_at DESC, id DESC"
                ))
                .map_err(|err| db_error(&err))?;
            let rows = stmt
                .query_map(params![store.get()], map_promotion)
                .map_err(|err| db_error(&err))?;
            rows.collect::<Result<Vec<_>, _>>().map_err(|err| db_error(&err))
        })
    }

    fn update_promotion(
        &self,
        id: PromotionId,
        draft: &PromotionDraft,
    ) -> Result<Promotion, StoreError> {
        draft.validate()?;
        self.with_transaction(|tx| {
            let changed = tx
                .execute(
                    "UPDATE promotions SET name = ?2, starts_at = ?3, ends_at = ?4,
                     max_quantity = ?5, discount_bps = ?6 WHERE id = ?1",
                    params![
                        id.get(),
                        draft.name,
                        draft.schedule.starts_at.as_unix_seconds(),
                        draft.schedule.ends_at.as_unix_seconds(),
                        draft.max_quantity,
                        draft.discount_percent.basis_points()
                    ],
                )
                .map_err(|err| db_error(&err))?;
            if changed == 0 {
                return Err(StoreError::NotFound("Promotion not found".to_string()));
            }
            load_promotion(tx, id)?
                .ok_or_else(|| StoreError::NotFound("Promotion not found".to_string()))
        })
    }

    fn delete_promotion(&self, id: PromotionId) -> Result<bool, StoreError> {
        // Products drop the reference through ON DELETE SET NULL.
        self.with_connection(|connection| {
            let removed = connection
                .execute("DELETE FROM promotions WHERE id = ?1", params![id.get()])
                .map_err(|err| db_error(&err))?;
            Ok(removed > 0)
        })
    }

    fn set_product_promotion(
        &self,
        product: ProductId,
        promotion: Option<PromotionId>,
        at: Timestamp,
    ) -> Result<Product, StoreError> {
        self.with_transaction(|tx| {
            if let Some(promotion) = promotion
                && load_promotion(tx, promotion)?.is_none()
            {
                return Err(StoreError::NotFound("Promotion not found".to_string()));
            }
            let changed = tx
                .execute(
                    "UPDATE products SET promotion_id = ?2, updated_at = ?3 WHERE id = ?1",
                    params![
                        product.get(),
                        promotion.map(PromotionId::get),
                        at.as_unix_seconds()
                    ],
                )
                .map_err(|err| db_error(&err))?;
            if changed == 0 {
                return Err(StoreError::NotFound("Product not found".to_string()));
            }
            require_product(tx, product)
        })
    }
}
