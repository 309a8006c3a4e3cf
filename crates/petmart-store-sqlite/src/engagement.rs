// crates/petmart-store-sqlite/src/engagement.rs
// ============================================================================
// Module: SQLite Engagement Store
// Description: Wishlists, reviews, and rating aggregates.
// Purpose: Implement EngagementStore over the shared SQLite connection.
// Dependencies: petmart-core, rusqlite
// ============================================================================

//! Wishlist and review rows.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petmart_core::DomainError;
use petmart_core::EngagementStore;
use petmart_core::Money;
use petmart_core::NewReview;
use petmart_core::ProductId;
use petmart_core::Rating;
use petmart_core::RatingSummary;
use petmart_core::Review;
use petmart_core::ReviewId;
use petmart_core::ReviewPatch;
use petmart_core::StoreError;
use petmart_core::Timestamp;
use petmart_core::UserId;
use petmart_core::WishlistEntry;
use petmart_core::WishlistId;
use petmart_core::WishlistLine;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use rusqlite::types::Type;

use crate::rows::load_images;
use crate::rows::timestamp_at;
use crate::store::SqliteMarketStore;
use crate::store::db_error;
use crate::store::write_error;

// ============================================================================
// SECTION: Row Mapping
// ============================================================================

/// Review select joined with the reviewer's name.
const REVIEW_SELECT: &str = "SELECT r.id, r.user_id, u.name, r.product_id, r.rating, r.review, \
     r.created_at, r.updated_at FROM reviews r JOIN users u ON u.id = r.user_id";

/// Decodes a [`REVIEW_SELECT`] row.
fn map_review(row: &Row<'_>) -> rusqlite::Result<Review> {
    let rating = Rating::new(row.get(4)?).map_err(|err: DomainError| {
        rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, Box::new(err))
    })?;
    Ok(Review {
        id: ReviewId::new(row.get(0)?),
        user_id: UserId::new(row.get(1)?),
        reviewer_name: row.get(2)?,
        product_id: ProductId::new(row.get(3)?),
        rating,
        review: row.get(5)?,
        created_at: timestamp_at(row, 6)?,
        updated_at: timestamp_at(row, 7)?,
    })
}

/// Loads a review by id.
fn load_review(connection: &Connection, id: ReviewId) -> Result<Option<Review>, StoreError> {
    connection
        .query_row(&format!("{REVIEW_SELECT} WHERE r.id = ?1"), params![id.get()], map_review)
        .optional()
        .map_err(|err| db_error(&err))
}

// ============================================================================
// SECTION: EngagementStore
// ============================================================================

impl EngagementStore for SqliteMarketStore {
    fn add_wishlist(
        &self,
        user: UserId,
        product: ProductId,
        at: Timestamp,
    ) -> Result<WishlistEntry, StoreError> {
        self.with_connection(|connection| {
            connection
                .execute(
                    "INSERT INTO wishlist_items (user_id, product_id, created_at) VALUES (?1, ?2, ?3)",
                    params![user.get(), product.get(), at.as_unix_seconds()],
                )
                .map_err(|err| write_error(&err, "Product is already in the wishlist"))?;
            Ok(WishlistEntry {
                id: WishlistId::new(connection.last_insert_rowid()),
                user_id: user,
                product_id: product,
                created_at: at,
            })
        })
    }

    fn wishlist(&self, user: UserId) -> Result<Vec<WishlistLine>, StoreError> {
        self.with_connection(|connection| {
            let mut stmt = connection
                .prepare(
                    "SELECT w.id, w.product_id, p.name, p.price_cents, w.created_at
                     FROM wishlist_items w JOIN products p ON p.id = w.product_id
                     WHERE w.user_id = ?1 ORDER BY w.created_at DESC, w.id DESC",
                )
                .map_err(|err| db_error(&err))?;
            let lines = stmt
                .query_map(params![user.get()], |row| {
                    Ok(WishlistLine {
                        wishlist_id: WishlistId::new(row.get(0)?),
                        product_id: ProductId::new(row.get(1)?),
                        product_name: row.get(2)?,
                        product_price: Money::from_cents(row.get(3)?),
                        product_images: Vec::new(),
                        added_at: timestamp_at(row, 4)?,
                    })
                })
                .map_err(|err| db_error(&err))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| db_error(&err))?;
            lines
                .into_iter()
                .map(|mut line| {
                    line.product_images = load_images(connection, line.product_id)?
                        .into_iter()
                        .map(|image| image.image_url)
                        .collect();
                    Ok(line)
                })
                .collect()
        })
    }

    fn remove_wishlist(&self, user: UserId, product: ProductId) -> Result<bool, StoreError> {
        self.with_connection(|connection| {
            let removed = connection
                .execute(
                    "DELETE FROM wishlist_items WHERE user_id = ?1 AND product_id = ?2",
                    params![user.get(), product.get()],
                )
                .map_err(|err| db_error(&err))?;
            Ok(removed > 0)
        })
    }

    fn create_review(&self, review: &NewReview, at: Timestamp) -> Result<Review, StoreError> {
        self.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO reviews (user_id, product_id, rating, review, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![
                    review.user_id.get(),
                    review.product_id.get(),
                    review.rating.get(),
                    review.review,
                    at.as_unix_seconds()
                ],
            )
            .map_err(|err| write_error(&err, "You have already reviewed this product"))?;
            let id = ReviewId::new(tx.last_insert_rowid());
            load_review(tx, id)?
                .ok_or_else(|| StoreError::Db("inserted review missing".to_string()))
        })
    }

    fn review_by_id(&self, id: ReviewId) -> Result<Option<Review>, StoreError> {
        self.with_connection(|connection| load_review(connection, id))
    }

    fn reviews_for_product(&self, product: ProductId) -> Result<Vec<Review>, StoreError> {
        self.with_connection(|connection| {
            let mut stmt = connection
                .prepare(&format!(
                    "{REVIEW_SELECT} WHERE r.product_id = ?1 ORDER BY r.created_at DESC, r.id DESC"
                ))
                .map_err(|err| db_error(&err))?;
            let rows =
                stmt.query_map(params![product.get()], map_review).map_err(|err| db_error(&err))?;
            rows.collect::<Result<Vec<_>, _>>().map_err(|err| db_error(&err))
        })
    }

    fn rating_summary(&self, product: ProductId) -> Result<RatingSummary, StoreError> {
        self.with_connection(|connection| {
            let (total, count): (i64, u32) = connection
                .query_row(
                    "SELECT COALESCE(SUM(rating), 0), COUNT(*) FROM reviews WHERE product_id = ?1",
                    params![product.get()],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .map_err(|err| db_error(&err))?;
            let total = u64::try_from(total)
                .map_err(|_| StoreError::Invalid("negative rating total".to_string()))?;
            Ok(RatingSummary::from_totals(total, count))
        })
    }

    fn update_review(
        &self,
        id: ReviewId,
        patch: &ReviewPatch,
        at: Timestamp,
    ) -> Result<Review, StoreError> {
        self.with_transaction(|tx| {
            let changed = tx
                .execute(
                    "UPDATE reviews SET rating = COALESCE(?2, rating),
                     review = CASE WHEN ?3 THEN ?4 ELSE review END, updated_at = ?5
                     WHERE id = ?1",
                    params![
                        id.get(),
                        patch.rating.map(Rating::get),
                        patch.review.is_some(),
                        patch.review.as_ref().and_then(Option::as_deref),
                        at.as_unix_seconds()
                    ],
                )
                .map_err(|err| db_error(&err))?;
            if changed == 0 {
                return Err(StoreError::NotFound("Review not found".to_string()));
            }
            load_review(tx, id)?.ok_or_else(|| StoreError::NotFound("Review not found".to_string()))
        })
    }

    fn delete_review(&self, id: ReviewId) -> Result<bool, StoreError> {
        self.with_connection(|connection| {
            let removed = connection
                .execute("DELETE FROM reviews WHERE id = ?1", params![id.get()])
                .map_err(|err| db_error(&err))?;
            Ok(removed > 0)
        })
    }
}
