// crates/petmart-config/src/lib.rs
// ============================================================================
// Module: Petmart Config Library
// Description: Canonical config model, loading, and validation.
// Purpose: Single source of truth for petmart.toml semantics.
// Dependencies: petmart-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `petmart-config` defines the configuration model for the Petmart server.
//! Files are size-limited, must be UTF-8, and are validated fail-closed
//! before any listener or database is opened.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
