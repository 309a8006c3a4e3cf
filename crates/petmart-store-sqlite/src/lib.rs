// crates/petmart-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Market Store
// Description: Durable MarketStore backend using SQLite.
// Purpose: Provide transactional persistence for every Petmart aggregate.
// Dependencies: petmart-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`petmart_core::MarketStore`]. A single
//! connection is shared behind a mutex; multi-row operations such as checkout
//! and cancellation run in one transaction and roll back on any failure. The
//! same schema backs both on-disk databases and the in-memory store used for
//! development and tests.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod accounts;
mod cart;
mod catalog;
mod engagement;
mod orders;
mod promotions;
mod rows;
mod schema;
pub mod store;
mod storefronts;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteMarketStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
