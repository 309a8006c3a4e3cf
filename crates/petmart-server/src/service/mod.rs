// crates/petmart-server/src/service/mod.rs
// ============================================================================
// Module: Marketplace Services
// Description: Transport-neutral marketplace operations.
// Purpose: Validate requests, enforce ownership, and drive the market store.
// Dependencies: petmart-core, serde
// ============================================================================

//! ## Overview
//! [`MarketService`] owns every dependency a request needs: the store, the
//! clock, token and password primitives, the OTP policy, the notifier, and
//! the audit sink. Operations are synchronous and return [`ApiError`] so
//! that HTTP handlers stay thin. Each submodule adds one slice of the API.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use petmart_core::Clock;
use petmart_core::MarketStore;
use petmart_core::OtpPolicy;
use petmart_core::Storefront;
use petmart_core::Timestamp;
use petmart_core::UserId;

use crate::audit::AccountAuditEvent;
use crate::audit::AuditSink;
use crate::error::ApiError;
use crate::notify::OtpNotifier;
use crate::password::PasswordHasher;
use crate::token::TokenSigner;

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod engagement;
pub mod orders;
pub mod promotions;
pub mod storefronts;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Message for seller-only routes called by non-sellers.
pub(crate) const NO_STORE_MESSAGE: &str = "You don't have a registered store";
/// Message for empty patch bodies.
pub(crate) const NO_INPUT_MESSAGE: &str = "No input data provided";

// ============================================================================
// SECTION: Service
// ============================================================================

/// Marketplace service shared by all handlers.
pub struct MarketService {
    /// Persistence backend.
    store: Arc<dyn MarketStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Token signer.
    tokens: TokenSigner,
    /// Password hasher.
    passwords: PasswordHasher,
    /// OTP policy.
    otp: OtpPolicy,
    /// OTP delivery channel.
    notifier: Arc<dyn OtpNotifier>,
    /// Audit destination.
    audit: Arc<dyn AuditSink>,
    /// Sender address for OTP messages.
    sender: String,
}

/// Dependencies for [`MarketService::new`].
pub struct MarketServiceParts {
    /// Persistence backend.
    pub store: Arc<dyn MarketStore>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Token signer.
    pub tokens: TokenSigner,
    /// Password hasher.
    pub passwords: PasswordHasher,
    /// OTP policy.
    pub otp: OtpPolicy,
    /// OTP delivery channel.
    pub notifier: Arc<dyn OtpNotifier>,
    /// Audit destination.
    pub audit: Arc<dyn AuditSink>,
    /// Sender address for OTP messages.
    pub sender: String,
}

impl MarketService {
    /// Assembles a service from its parts.
    #[must_use]
    pub fn new(parts: MarketServiceParts) -> Self {
        Self {
            store: parts.store,
            clock: parts.clock,
            tokens: parts.tokens,
            passwords: parts.passwords,
            otp: parts.otp,
            notifier: parts.notifier,
            audit: parts.audit,
            sender: parts.sender,
        }
    }

    /// Returns the token signer.
    #[must_use]
    pub const fn tokens(&self) -> &TokenSigner {
        &self.tokens
    }

    /// Returns the audit sink.
    #[must_use]
    pub fn audit(&self) -> &dyn AuditSink {
        self.audit.as_ref()
    }

    /// Returns the current time.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Records an account audit event.
    fn record(&self, event: &AccountAuditEvent) {
        self.audit.record_account(event);
    }

    /// Resolves the caller's storefront for seller-only operations.
    fn seller_store(&self, caller: UserId) -> Result<Storefront, ApiError> {
        self.store
            .storefront_by_owner(caller)?
            .ok_or_else(|| ApiError::forbidden(NO_STORE_MESSAGE))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the trimmed value when it is present and non-blank.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
