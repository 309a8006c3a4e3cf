// crates/petmart-store-sqlite/src/storefronts.rs
// ============================================================================
// Module: SQLite Storefront Store
// Description: Seller storefront persistence.
// Purpose: Implement StorefrontStore over the shared SQLite connection.
// Dependencies: petmart-core, rusqlite
// ============================================================================

//! Storefront rows. Creating one also flags the owner as a seller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petmart_core::NewStorefront;
use petmart_core::StoreError;
use petmart_core::StoreId;
use petmart_core::Storefront;
use petmart_core::StorefrontPatch;
use petmart_core::StorefrontStatus;
use petmart_core::StorefrontStore;
use petmart_core::Timestamp;
use petmart_core::UserId;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;

use crate::rows::STOREFRONT_COLUMNS;
use crate::rows::map_storefront;
use crate::store::SqliteMarketStore;
use crate::store::db_error;
use crate::store::write_error;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads a storefront by id.
fn load_storefront(connection: &Connection, id: StoreId) -> Result<Option<Storefront>, StoreError> {
    connection
        .query_row(
            &format!("SELECT {STOREFRONT_COLUMNS} FROM storefronts WHERE id = ?1"),
            params![id.get()],
            map_storefront,
        )
        .optional()
        .map_err(|err| db_error(&err))
}

// ============================================================================
// SECTION: StorefrontStore
// ============================================================================

impl StorefrontStore for SqliteMarketStore {
    fn create_storefront(
        &self,
        storefront: &NewStorefront,
        at: Timestamp,
    ) -> Result<Storefront, StoreError> {
        self.with_transaction(|tx| {
            let owner_has_store: Option<i64> = tx
                .query_row(
                    "SELECT id FROM storefronts WHERE owner_id = ?1",
                    params![storefront.owner_id.get()],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|err| db_error(&err))?;
            if owner_has_store.is_some() {
                return Err(StoreError::Conflict(
                    "User already has a registered store".to_string(),
                ));
            }
            tx.execute(
                "INSERT INTO storefronts (owner_id, name, domain, address, description, status, \
                 created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    storefront.owner_id.get(),
                    storefront.name,
                    storefront.domain,
                    storefront.address,
                    storefront.description,
                    StorefrontStatus::Active.as_str(),
                    at.as_unix_seconds()
                ],
            )
            .map_err(|err| write_error(&err, "Domain name is already taken"))?;
            let id = StoreId::new(tx.last_insert_rowid());
            let changed = tx
                .execute(
                    "UPDATE users SET is_seller = 1, updated_at = ?2 WHERE id = ?1",
                    params![storefront.owner_id.get(), at.as_unix_seconds()],
                )
                .map_err(|err| db_error(&err))?;
            if changed == 0 {
                return Err(StoreError::NotFound("User not found".to_string()));
            }
            load_storefront(tx, id)?
                .ok_or_else(|| StoreError::Db("inserted storefront missing".to_string()))
        })
    }

    fn storefront_by_owner(&self, owner: UserId) -> Result<Option<Storefront>, StoreError> {
        self.with_connection(|connection| {
            connection
                .query_row(
                    &format!("SELECT {STOREFRONT_COLUMNS} FROM storefronts WHERE owner_id = ?1"),
                    params![owner.get()],
                    map_storefront,
                )
                .optional()
                .map_err(|err| db_error(&err))
        })
    }

    fn storefront_by_id(&self, id: StoreId) -> Result<Option<Storefront>, StoreError> {
        self.with_connection(|connection| load_storefront(connection, id))
    }

    fn update_storefront(
        &self,
        id: StoreId,
        patch: &StorefrontPatch,
        at: Timestamp,
    ) -> Result<Storefront, StoreError> {
        self.with_transaction(|tx| {
            let changed = tx
                .execute(
                    "UPDATE storefronts SET name = COALESCE(?2, name),
                     address = COALESCE(?3, address), description = COALESCE(?4, description),
                     updated_at = ?5 WHERE id = ?1",
                    params![
                        id.get(),
                        patch.name,
                        patch.address,
                        patch.description,
                        at.as_unix_seconds()
                    ],
                )
                .map_err(|err| db_error(&err))?;
            if changed == 0 {
                return Err(StoreError::NotFound("Store not found".to_string()));
            }
            load_storefront(tx, id)?
                .ok_or_else(|| StoreError::NotFound("Store not found".to_string()))
        })
    }
}
