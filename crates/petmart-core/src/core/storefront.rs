// crates/petmart-core/src/core/storefront.rs
// ============================================================================
// Module: Petmart Storefronts
// Description: Seller storefront records and domain-name rules.
// Purpose: Give each seller exactly one addressable store.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A storefront belongs to one user and is addressed by a unique domain slug.
//! Owning a storefront is what makes a user a seller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::clock::Timestamp;
use crate::core::error::DomainError;
use crate::core::identifiers::StoreId;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Minimum domain slug length.
const MIN_DOMAIN_LENGTH: usize = 3;
/// Maximum domain slug length.
const MAX_DOMAIN_LENGTH: usize = 63;
/// Maximum store name length.
pub const MAX_STORE_NAME_LENGTH: usize = 100;
/// Maximum store description length.
pub const MAX_STORE_DESCRIPTION_LENGTH: usize = 2_000;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Storefront lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorefrontStatus {
    /// Store is open for business.
    #[default]
    Active,
}

impl StorefrontStatus {
    /// Returns the persisted label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
        }
    }

    /// Parses a persisted label.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            _ => None,
        }
    }
}

/// Seller storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storefront {
    /// Store identifier.
    pub id: StoreId,
    /// Owning user.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Unique domain slug.
    pub domain: String,
    /// Full postal address.
    pub address: String,
    /// Optional description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: StorefrontStatus,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
}

/// Input for registering a storefront.
#[derive(Debug, Clone)]
pub struct NewStorefront {
    /// Owning user.
    pub owner_id: UserId,
    /// Display name.
    pub name: String,
    /// Unique domain slug.
    pub domain: String,
    /// Full postal address.
    pub address: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Partial storefront update.
#[derive(Debug, Clone, Default)]
pub struct StorefrontPatch {
    /// New display name.
    pub name: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New description.
    pub description: Option<String>,
}

impl StorefrontPatch {
    /// Returns true when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none() && self.description.is_none()
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a domain slug: lowercase ASCII letters, digits, and inner hyphens.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] for malformed slugs.
pub fn validate_domain(raw: &str) -> Result<String, DomainError> {
    let domain = raw.trim();
    let charset_ok =
        domain.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    let length_ok = (MIN_DOMAIN_LENGTH ..= MAX_DOMAIN_LENGTH).contains(&domain.len());
    if !charset_ok || !length_ok || domain.starts_with('-') || domain.ends_with('-') {
        return Err(DomainError::Validation(format!(
            "Domain name must be {MIN_DOMAIN_LENGTH}-{MAX_DOMAIN_LENGTH} lowercase letters, \
             digits, or inner hyphens"
        )));
    }
    Ok(domain.to_string())
}

/// Validates a store display name.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] when empty or too long.
pub fn validate_store_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() || name.chars().count() > MAX_STORE_NAME_LENGTH {
        return Err(DomainError::Validation(format!(
            "Store name must be 1-{MAX_STORE_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

/// Validates an optional store description.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] when too long.
pub fn validate_store_description(raw: &str) -> Result<String, DomainError> {
    let description = raw.trim();
    if description.chars().count() > MAX_STORE_DESCRIPTION_LENGTH {
        return Err(DomainError::Validation(format!(
            "Store description must be at most {MAX_STORE_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(description.to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
