// crates/petmart-server/src/service/storefronts.rs
// ============================================================================
// Module: Storefront Services
// Description: Seller storefront registration and management.
// Purpose: Let a user open one store and maintain its details.
// Dependencies: petmart-core, serde
// ============================================================================

//! Storefront registration. Owning a storefront is what makes a user a seller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petmart_core::NewStorefront;
use petmart_core::Storefront;
use petmart_core::StorefrontPatch;
use petmart_core::UserId;
use petmart_core::account::validate_address;
use petmart_core::error::require_fields;
use petmart_core::storefront::validate_domain;
use petmart_core::storefront::validate_store_description;
use petmart_core::storefront::validate_store_name;
use serde::Deserialize;

use crate::error::ApiError;
use crate::service::MarketService;
use crate::service::NO_INPUT_MESSAGE;
use crate::service::NO_STORE_MESSAGE;
use crate::service::present;

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Storefront registration request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterStoreRequest {
    /// Store name.
    pub name: Option<String>,
    /// Unique store domain.
    pub domain: Option<String>,
    /// Store address.
    pub address: Option<String>,
    /// Optional description.
    pub description: Option<String>,
}

/// Storefront update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStoreRequest {
    /// New store name.
    pub name: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New description.
    pub description: Option<String>,
}

// ============================================================================
// SECTION: Operations
// ============================================================================

impl MarketService {
    /// Opens a storefront for the caller and marks them as a seller.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for invalid input, a second store, or a taken
    /// domain.
    pub fn register_store(
        &self,
        caller: UserId,
        request: &RegisterStoreRequest,
    ) -> Result<Storefront, ApiError> {
        let name = present(request.name.as_deref());
        let domain = present(request.domain.as_deref());
        let address = present(request.address.as_deref());
        require_fields(&[
            ("name", name.is_some()),
            ("domain", domain.is_some()),
            ("address", address.is_some()),
        ])?;
        let (Some(name), Some(domain), Some(address)) = (name, domain, address) else {
            return Err(ApiError::validation("Missing required fields"));
        };
        let storefront = NewStorefront {
            owner_id: caller,
            name: validate_store_name(name)?,
            domain: validate_domain(domain)?,
            address: validate_address(address)?,
            description: present(request.description.as_deref())
                .map(validate_store_description)
                .transpose()?,
        };
        Ok(self.store.create_storefront(&storefront, self.now())?)
    }

    /// Returns the caller's storefront.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] with status 404 when the caller has no store.
    pub fn my_store(&self, caller: UserId) -> Result<Storefront, ApiError> {
        self.store
            .storefront_by_owner(caller)?
            .ok_or_else(|| ApiError::not_found(NO_STORE_MESSAGE))
    }

    /// Updates the caller's storefront.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the caller has no store or the update is
    /// empty or invalid.
    pub fn update_store(
        &self,
        caller: UserId,
        request: &UpdateStoreRequest,
    ) -> Result<Storefront, ApiError> {
        let storefront = self.my_store(caller)?;
        let patch = StorefrontPatch {
            name: request.name.as_deref().map(validate_store_name).transpose()?,
            address: request.address.as_deref().map(validate_address).transpose()?,
            description: request
                .description
                .as_deref()
                .map(validate_store_description)
                .transpose()?,
        };
        if patch.is_empty() {
            return Err(ApiError::validation(NO_INPUT_MESSAGE));
        }
        Ok(self.store.update_storefront(storefront.id, &patch, self.now())?)
    }
}
