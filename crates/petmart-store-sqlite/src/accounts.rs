// crates/petmart-store-sqlite/src/accounts.rs
// ============================================================================
// Module: SQLite Account Store
// Description: Users, pending registrations, and revoked tokens.
// Purpose: Implement AccountStore over the shared SQLite connection.
// Dependencies: petmart-core, rusqlite
// ============================================================================

//! Account rows. OTP verification runs in one transaction so attempt
//! counts cannot be raced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petmart_core::AccountStore;
use petmart_core::Credentials;
use petmart_core::NewUser;
use petmart_core::OtpCheck;
use petmart_core::OtpPolicy;
use petmart_core::OtpVerification;
use petmart_core::PendingRegistration;
use petmart_core::StoreError;
use petmart_core::Timestamp;
use petmart_core::User;
use petmart_core::UserId;
use petmart_core::UserPatch;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::params;

use crate::rows::USER_COLUMNS;
use crate::rows::load_user;
use crate::rows::map_user;
use crate::rows::timestamp_at;
use crate::store::SqliteMarketStore;
use crate::store::db_error;
use crate::store::write_error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Conflict message for duplicate emails.
const EMAIL_TAKEN: &str = "Email already registered";

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Inserts a user row and returns it.
fn insert_user(
    connection: &Connection,
    user: &NewUser,
    at: Timestamp,
) -> Result<User, StoreError> {
    connection
        .execute(
            "INSERT INTO users (name, email, phone, password_hash, is_seller, created_at, \
             updated_at) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
            params![user.name, user.email, user.phone, user.password_hash, at.as_unix_seconds()],
        )
        .map_err(|err| write_error(&err, EMAIL_TAKEN))?;
    let id = UserId::new(connection.last_insert_rowid());
    load_user(connection, id)?.ok_or_else(|| StoreError::Db("inserted user missing".to_string()))
}

/// Loads a pending registration.
fn load_pending(
    connection: &Connection,
    email: &str,
) -> Result<Option<PendingRegistration>, StoreError> {
    connection
        .query_row(
            "SELECT email, code, name, phone, password_hash, created_at, expires_at, \
             last_sent_at, failed_attempts FROM pending_registrations WHERE email = ?1",
            params![email],
            |row| {
                Ok(PendingRegistration {
                    email: row.get(0)?,
                    code: row.get(1)?,
                    name: row.get(2)?,
                    phone: row.get(3)?,
                    password_hash: row.get(4)?,
                    created_at: timestamp_at(row, 5)?,
                    expires_at: timestamp_at(row, 6)?,
                    last_sent_at: timestamp_at(row, 7)?,
                    failed_attempts: row.get(8)?,
                })
            },
        )
        .optional()
        .map_err(|err| db_error(&err))
}

/// Deletes a pending registration, returning whether a row was removed.
fn delete_pending(connection: &Connection, email: &str) -> Result<bool, StoreError> {
    let removed = connection
        .execute("DELETE FROM pending_registrations WHERE email = ?1", params![email])
        .map_err(|err| db_error(&err))?;
    Ok(removed > 0)
}

// ============================================================================
// SECTION: AccountStore
// ============================================================================

impl AccountStore for SqliteMarketStore {
    fn user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.with_connection(|connection| load_user(connection, id))
    }

    fn credentials_by_email(&self, email: &str) -> Result<Option<Credentials>, StoreError> {
        self.with_connection(|connection| {
            connection
                .query_row(
                    &format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?1"),
                    params![email],
                    |row| {
                        Ok(Credentials {
                            user: map_user(row)?,
                            password_hash: row.get(9)?,
                        })
                    },
                )
                .optional()
                .map_err(|err| db_error(&err))
        })
    }

    fn update_user(
        &self,
        id: UserId,
        patch: &UserPatch,
        at: Timestamp,
    ) -> Result<User, StoreError> {
        self.with_transaction(|tx| {
            let changed = tx
                .execute(
                    "UPDATE users SET name = COALESCE(?2, name), phone = COALESCE(?3, phone),
                     address = COALESCE(?4, address),
                     profile_photo_url = COALESCE(?5, profile_photo_url), updated_at = ?6
                     WHERE id = ?1",
                    params![
                        id.get(),
                        patch.name,
                        patch.phone,
                        patch.address,
                        patch.profile_photo_url,
                        at.as_unix_seconds()
                    ],
                )
                .map_err(|err| db_error(&err))?;
            if changed == 0 {
                return Err(StoreError::NotFound("User not found".to_string()));
            }
            load_user(tx, id)?.ok_or_else(|| StoreError::NotFound("User not found".to_string()))
        })
    }

    fn save_pending_registration(&self, pending: &PendingRegistration) -> Result<(), StoreError> {
        self.with_connection(|connection| {
            connection
                .execute(
                    "INSERT OR REPLACE INTO pending_registrations (email, code, name, phone, \
                     password_hash, created_at, expires_at, last_sent_at, failed_attempts) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                    params![
                        pending.email,
                        pending.code,
                        pending.name,
                        pending.phone,
                        pending.password_hash,
                        pending.created_at.as_unix_seconds(),
                        pending.expires_at.as_unix_seconds(),
                        pending.last_sent_at.as_unix_seconds(),
                        pending.failed_attempts
                    ],
                )
                .map_err(|err| db_error(&err))?;
            Ok(())
        })
    }

    fn pending_registration(&self, email: &str) -> Result<Option<PendingRegistration>, StoreError> {
        self.with_connection(|connection| load_pending(connection, email))
    }

    fn delete_pending_registration(&self, email: &str) -> Result<bool, StoreError> {
        self.with_connection(|connection| delete_pending(connection, email))
    }

    fn verify_pending_registration(
        &self,
        email: &str,
        code: &str,
        policy: &OtpPolicy,
        at: Timestamp,
    ) -> Result<OtpVerification, StoreError> {
        self.with_transaction(|tx| {
            let Some(pending) = load_pending(tx, email)? else {
                return Ok(OtpVerification::NoPending);
            };
            match policy.check(&pending, code, at) {
                OtpCheck::Expired => Ok(OtpVerification::Expired),
                OtpCheck::Mismatch {
                    attempts,
                } => {
                    tx.execute(
                        "UPDATE pending_registrations SET failed_attempts = ?2 WHERE email = ?1",
                        params![email, attempts],
                    )
                    .map_err(|err| db_error(&err))?;
                    Ok(OtpVerification::Mismatch {
                        attempts,
                    })
                }
                OtpCheck::Exhausted => {
                    delete_pending(tx, email)?;
                    Ok(OtpVerification::Exhausted)
                }
                OtpCheck::Accepted => {
                    let user = insert_user(
                        tx,
                        &NewUser {
                            name: pending.name,
                            email: pending.email,
                            phone: pending.phone,
                            password_hash: pending.password_hash,
                        },
                        at,
                    )?;
                    delete_pending(tx, email)?;
                    Ok(OtpVerification::Registered(user))
                }
            }
        })
    }

    fn revoke_token(&self, jti: &str, expires_at: Timestamp) -> Result<(), StoreError> {
        self.with_connection(|connection| {
            connection
                .execute(
                    "INSERT OR REPLACE INTO revoked_tokens (jti, expires_at) VALUES (?1, ?2)",
                    params![jti, expires_at.as_unix_seconds()],
                )
                .map_err(|err| db_error(&err))?;
            Ok(())
        })
    }

    fn is_token_revoked(&self, jti: &str, now: Timestamp) -> Result<bool, StoreError> {
        self.with_connection(|connection| {
            connection
                .execute(
                    "DELETE FROM revoked_tokens WHERE expires_at < ?1",
                    params![now.as_unix_seconds()],
                )
                .map_err(|err| db_error(&err))?;
            let found: Option<i64> = connection
                .query_row("SELECT 1 FROM revoked_tokens WHERE jti = ?1", params![jti], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(|err| db_error(&err))?;
            Ok(found.is_some())
        })
    }
}
