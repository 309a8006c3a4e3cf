// crates/petmart-core/src/core/error.rs
// ============================================================================
// Module: Petmart Domain Errors
// Description: Business-rule rejections shared across services and stores.
// Purpose: Give every rejection a stable kind that transports can map.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! [`DomainError`] is raised when input or state violates a marketplace rule.
//! The message is user-facing; the variant decides how a transport reports it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Business-rule rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Input failed validation.
    #[error("{0}")]
    Validation(String),
    /// A referenced record does not exist (or is not visible to the caller).
    #[error("{0}")]
    NotFound(String),
    /// The caller is not allowed to act on the record.
    #[error("{0}")]
    Forbidden(String),
    /// The request conflicts with existing state.
    #[error("{0}")]
    Conflict(String),
    /// The action was attempted too soon.
    #[error("{message}")]
    RateLimited {
        /// User-facing message.
        message: String,
        /// Seconds until the action may be retried.
        retry_after_secs: u64,
    },
}

impl DomainError {
    /// Builds a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Builds a not-found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Builds a forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    /// Builds a conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

/// Fails with a "Missing required fields" validation error naming each absent field.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] when any entry is `false`.
pub fn require_fields(fields: &[(&str, bool)]) -> Result<(), DomainError> {
    let missing: Vec<&str> =
        fields.iter().filter(|(_, present)| !present).map(|(name, _)| *name).collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(DomainError::Validation(format!("Missing required fields: {}", missing.join(", "))))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
