// crates/petmart-core/src/core/account.rs
// ============================================================================
// Module: Petmart Accounts
// Description: User records, pending registrations, and profile validation.
// Purpose: Normalize and validate identity fields before they are persisted.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`User`] is created only after the email OTP is confirmed; until then the
//! hashed credentials live in a [`PendingRegistration`]. Password hashes are
//! carried in [`Credentials`] and never serialized with the user record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::clock::Timestamp;
use crate::core::error::DomainError;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum display name length.
pub const MAX_NAME_LENGTH: usize = 100;
/// Maximum email length.
pub const MAX_EMAIL_LENGTH: usize = 100;
/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;
/// Maximum free-form address length.
pub const MAX_ADDRESS_LENGTH: usize = 255;
/// Maximum URL length.
pub const MAX_URL_LENGTH: usize = 255;
/// Minimum phone digits.
const MIN_PHONE_DIGITS: usize = 6;
/// Maximum phone digits.
const MAX_PHONE_DIGITS: usize = 15;

// ============================================================================
// SECTION: Records
// ============================================================================

/// Registered marketplace user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Lowercased email address.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Free-form postal address.
    pub address: Option<String>,
    /// Profile photo URL.
    pub profile_photo_url: Option<String>,
    /// True once the user owns a storefront.
    pub is_seller: bool,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last update time.
    pub updated_at: Timestamp,
}

/// Publicly visible subset of a user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicProfile {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Profile photo URL.
    pub profile_photo_url: Option<String>,
    /// True when the user owns a storefront.
    pub is_seller: bool,
    /// Creation time.
    pub created_at: Timestamp,
}

impl From<&User> for PublicProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            profile_photo_url: user.profile_photo_url.clone(),
            is_seller: user.is_seller,
            created_at: user.created_at,
        }
    }
}

/// User paired with the stored password hash.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// User record.
    pub user: User,
    /// Encoded password hash.
    pub password_hash: String,
}

/// Input for inserting a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Lowercased email address.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Encoded password hash.
    pub password_hash: String,
}

/// Partial profile update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    /// New display name.
    pub name: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New postal address.
    pub address: Option<String>,
    /// New profile photo URL.
    pub profile_photo_url: Option<String>,
}

impl UserPatch {
    /// Returns true when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.profile_photo_url.is_none()
    }
}

/// Registration awaiting OTP confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRegistration {
    /// Lowercased email address.
    pub email: String,
    /// Numeric OTP code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Encoded password hash.
    pub password_hash: String,
    /// First issue time.
    pub created_at: Timestamp,
    /// Code expiry time.
    pub expires_at: Timestamp,
    /// Time the current code was sent.
    pub last_sent_at: Timestamp,
    /// Wrong codes submitted against the current registration.
    pub failed_attempts: u32,
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Trims and lowercases an email, checking for a `local@domain.tld` shape.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] for malformed addresses.
pub fn normalize_email(raw: &str) -> Result<String, DomainError> {
    let email = raw.trim().to_ascii_lowercase();
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return Err(DomainError::validation("Invalid email address"));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::validation("Invalid email address"));
    };
    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..");
    if local.is_empty()
        || !domain_ok
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
    {
        return Err(DomainError::validation("Invalid email address"));
    }
    Ok(email)
}

/// Trims and validates a display name.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] when empty or too long.
pub fn validate_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("Name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::Validation(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(name.to_string())
}

/// Checks password length bounds.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] when out of bounds.
pub fn validate_password(password: &str) -> Result<(), DomainError> {
    let length = password.chars().count();
    if !(MIN_PASSWORD_LENGTH ..= MAX_PASSWORD_LENGTH).contains(&length) {
        return Err(DomainError::Validation(format!(
            "Password must be between {MIN_PASSWORD_LENGTH} and {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validates a phone number: digits with an optional leading `+`.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] for malformed numbers.
pub fn validate_phone(raw: &str) -> Result<String, DomainError> {
    let phone = raw.trim();
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    let valid = digits.chars().all(|c| c.is_ascii_digit())
        && (MIN_PHONE_DIGITS ..= MAX_PHONE_DIGITS).contains(&digits.len());
    if !valid {
        return Err(DomainError::validation("Invalid phone number"));
    }
    Ok(phone.to_string())
}

/// Validates a free-form postal address.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] when empty or too long.
pub fn validate_address(raw: &str) -> Result<String, DomainError> {
    let address = raw.trim();
    if address.is_empty() {
        return Err(DomainError::validation("Address must not be empty"));
    }
    if address.chars().count() > MAX_ADDRESS_LENGTH {
        return Err(DomainError::Validation(format!(
            "Address must be at most {MAX_ADDRESS_LENGTH} characters"
        )));
    }
    Ok(address.to_string())
}

/// Validates an absolute `http`/`https` URL.
///
/// # Errors
///
/// Returns [`DomainError::Validation`] naming `field` when invalid.
pub fn validate_http_url(field: &str, raw: &str) -> Result<String, DomainError> {
    let url = raw.trim();
    let rest = url.strip_prefix("https://").or_else(|| url.strip_prefix("http://"));
    let host_ok = rest.is_some_and(|rest| {
        let host = rest.split('/').next().unwrap_or_default();
        !host.is_empty()
    });
    if !host_ok || url.len() > MAX_URL_LENGTH || url.chars().any(char::is_whitespace) {
        return Err(DomainError::Validation(format!("{field} must be a valid http(s) URL")));
    }
    Ok(url.to_string())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
