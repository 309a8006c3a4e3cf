// crates/petmart-store-sqlite/src/cart.rs
// ============================================================================
// Module: SQLite Cart Store
// Description: Shopping cart lines keyed by user and product.
// Purpose: Implement CartStore over the shared SQLite connection.
// Dependencies: petmart-core, rusqlite
// ============================================================================

//! Cart rows. Quantity changes are checked against stock in the same
//! transaction that writes them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petmart_core::CartItem;
use petmart_core::CartItemId;
use petmart_core::CartLine;
use petmart_core::CartStore;
use petmart_core::DomainError;
use petmart_core::ProductId;
use petmart_core::StoreError;
use petmart_core::Timestamp;
use petmart_core::UserId;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;

use crate::rows::require_product;
use crate::rows::timestamp_at;
use crate::store::SqliteMarketStore;
use crate::store::db_error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Rejection when a line would hold more units than the product has.
const INSUFFICIENT_STOCK: &str = "Insufficient stock";
/// Missing cart line message.
const ITEM_NOT_FOUND: &str = "Item not found in cart";

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a product's current stock.
fn product_stock(connection: &Connection, id: ProductId) -> Result<u32, StoreError> {
    connection
        .query_row("SELECT stock FROM products WHERE id = ?1", params![id.get()], |row| row.get(0))
        .optional()
        .map_err(|err| db_error(&err))?
        .ok_or_else(|| StoreError::NotFound("Product not found".to_string()))
}

/// Cart item columns in [`map_cart_item`] order.
const CART_COLUMNS: &str = "id, user_id, product_id, quantity, created_at, updated_at";

/// Decodes a [`CART_COLUMNS`] row.
fn map_cart_item(row: &Row<'_>) -> rusqlite::Result<CartItem> {
    Ok(CartItem {
        id: CartItemId::new(row.get(0)?),
        user_id: UserId::new(row.get(1)?),
        product_id: ProductId::new(row.get(2)?),
        quantity: row.get(3)?,
        created_at: timestamp_at(row, 4)?,
        updated_at: timestamp_at(row, 5)?,
    })
}

/// Loads a cart item by id.
fn load_cart_item(connection: &Connection, id: CartItemId) -> Result<Option<CartItem>, StoreError> {
    connection
        .query_row(
            &format!("SELECT {CART_COLUMNS} FROM cart_items WHERE id = ?1"),
            params![id.get()],
            map_cart_item,
        )
        .optional()
        .map_err(|err| db_error(&err))
}

/// Loads a user's cart item for a product.
fn load_cart_item_for_product(
    connection: &Connection,
    user: UserId,
    product: ProductId,
) -> Result<Option<CartItem>, StoreError> {
    connection
        .query_row(
            &format!(
                "SELECT {CART_COLUMNS} FROM cart_items WHERE user_id = ?1 AND product_id = ?2"
            ),
            params![user.get(), product.get()],
            map_cart_item,
        )
        .optional()
        .map_err(|err| db_error(&err))
}

// ============================================================================
// SECTION: CartStore
// ============================================================================

impl CartStore for SqliteMarketStore {
    fn cart_lines(&self, user: UserId) -> Result<Vec<CartLine>, StoreError> {
        self.with_connection(|connection| {
            let mut stmt = connection
                .prepare(&format!(
                    "SELECT {CART_COLUMNS} FROM cart_items WHERE user_id = ?1 ORDER BY id"
                ))
                .map_err(|err| db_error(&err))?;
            let items = stmt
                .query_map(params![user.get()], map_cart_item)
                .map_err(|err| db_error(&err))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|err| db_error(&err))?;
            items
                .into_iter()
                .map(|item| {
                    let product = require_product(connection, item.product_id)?;
                    Ok(CartLine {
                        item,
                        product,
                    })
                })
                .collect()
        })
    }

    fn cart_item(&self, user: UserId, id: CartItemId) -> Result<Option<CartItem>, StoreError> {
        self.with_connection(|connection| {
            Ok(load_cart_item(connection, id)?.filter(|item| item.user_id == user))
        })
    }

    fn add_cart_quantity(
        &self,
        user: UserId,
        product: ProductId,
        quantity: u32,
        at: Timestamp,
    ) -> Result<CartItem, StoreError> {
        self.with_transaction(|tx| {
            let stock = product_stock(tx, product)?;
            let existing =
                load_cart_item_for_product(tx, user, product)?.map_or(0, |item| item.quantity);
            let merged = existing
                .checked_add(quantity)
                .filter(|merged| *merged <= stock)
                .ok_or_else(|| DomainError::validation(INSUFFICIENT_STOCK))?;
            tx.execute(
                "INSERT INTO cart_items (user_id, product_id, quantity, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT (user_id, product_id)
                 DO UPDATE SET quantity = excluded.quantity, updated_at = excluded.updated_at",
                params![user.get(), product.get(), merged, at.as_unix_seconds()],
            )
            .map_err(|err| db_error(&err))?;
            load_cart_item_for_product(tx, user, product)?
                .ok_or_else(|| StoreError::Db("cart item missing after upsert".to_string()))
        })
    }

    fn set_cart_quantity(
        &self,
        id: CartItemId,
        quantity: u32,
        at: Timestamp,
    ) -> Result<CartItem, StoreError> {
        self.with_transaction(|tx| {
            let item = load_cart_item(tx, id)?
                .ok_or_else(|| StoreError::NotFound(ITEM_NOT_FOUND.to_string()))?;
            if quantity > product_stock(tx, item.product_id)? {
                return Err(DomainError::validation(INSUFFICIENT_STOCK).into());
            }
            tx.execute(
                "UPDATE cart_items SET quantity = ?2, updated_at = ?3 WHERE id = ?1",
                params![id.get(), quantity, at.as_unix_seconds()],
            )
            .map_err(|err| db_error(&err))?;
            load_cart_item(tx, id)?
                .ok_or_else(|| StoreError::NotFound(ITEM_NOT_FOUND.to_string()))
        })
    }

    fn remove_cart_item(&self, user: UserId, id: CartItemId) -> Result<bool, StoreError> {
        self.with_connection(|connection| {
            let removed = connection
                .execute(
                    "DELETE FROM cart_items WHERE id = ?1 AND user_id = ?2",
                    params![id.get(), user.get()],
                )
                .map_err(|err| db_error(&err))?;
            Ok(removed > 0)
        })
    }

    fn clear_cart(&self, user: UserId) -> Result<u32, StoreError> {
        self.with_connection(|connection| {
            let removed = connection
                .execute("DELETE FROM cart_items WHERE user_id = ?1", params![user.get()])
                .map_err(|err| db_error(&err))?;
            u32::try_from(removed).map_err(|_| StoreError::Invalid("cart too large".to_string()))
        })
    }
}
