// crates/petmart-core/src/runtime/otp.rs
// ============================================================================
// Module: Petmart OTP Policy
// Description: One-time registration codes: issue, resend, and verification.
// Purpose: Confirm email ownership before an account is created.
// Dependencies: crate::core, rand, subtle
// ============================================================================

//! ## Overview
//! Registration issues a numeric code that expires after `ttl_secs`. A new
//! code for the same email may be requested once `resend_cooldown_secs` has
//! passed since the last send. Each wrong guess counts against
//! `max_attempts`; reaching the limit discards the pending registration.
//! Codes are compared in constant time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rand::Rng;
use rand::rngs::OsRng;
use subtle::ConstantTimeEq;

use crate::core::PendingRegistration;
use crate::core::Timestamp;
use crate::core::User;
use crate::core::error::DomainError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default code lifetime in seconds.
pub const DEFAULT_OTP_TTL_SECS: u64 = 300;
/// Default minimum interval between sends in seconds.
pub const DEFAULT_OTP_RESEND_COOLDOWN_SECS: u64 = 60;
/// Default wrong guesses allowed per registration.
pub const DEFAULT_OTP_MAX_ATTEMPTS: u32 = 5;
/// Default number of digits.
pub const DEFAULT_OTP_CODE_LENGTH: u32 = 6;

// ============================================================================
// SECTION: Types
// ============================================================================

/// OTP issue and verification policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpPolicy {
    /// Code lifetime in seconds.
    pub ttl_secs: u64,
    /// Minimum interval between sends in seconds.
    pub resend_cooldown_secs: u64,
    /// Wrong guesses allowed before the registration is discarded.
    pub max_attempts: u32,
    /// Number of digits.
    pub code_length: u32,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_OTP_TTL_SECS,
            resend_cooldown_secs: DEFAULT_OTP_RESEND_COOLDOWN_SECS,
            max_attempts: DEFAULT_OTP_MAX_ATTEMPTS,
            code_length: DEFAULT_OTP_CODE_LENGTH,
        }
    }
}

/// Outcome of checking a submitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpCheck {
    /// Code matches and is still valid.
    Accepted,
    /// Code lifetime has passed.
    Expired,
    /// Wrong code; the registration remains with `attempts` recorded.
    Mismatch {
        /// Wrong guesses so far, including this one.
        attempts: u32,
    },
    /// Wrong code and the attempt limit is reached.
    Exhausted,
}

/// Outcome of verifying a code against stored registration state.
///
/// Stores produce this from a single transaction so that concurrent guesses
/// observe each other's attempt counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpVerification {
    /// No pending registration exists for the email.
    NoPending,
    /// Code lifetime has passed; the registration is kept.
    Expired,
    /// Wrong code; the attempt count was persisted.
    Mismatch {
        /// Wrong guesses so far, including this one.
        attempts: u32,
    },
    /// Wrong code at the attempt limit; the registration was discarded.
    Exhausted,
    /// Code accepted; the user was created and the registration removed.
    Registered(User),
}

// ============================================================================
// SECTION: Policy
// ============================================================================

impl OtpPolicy {
    /// Generates a uniformly random numeric code.
    #[must_use]
    pub fn generate_code(&self) -> String {
        let mut rng = OsRng;
        (0 .. self.code_length).map(|_| char::from(b'0' + rng.gen_range(0 .. 10u8))).collect()
    }

    /// Issues a fresh pending registration.
    #[must_use]
    pub fn issue(
        &self,
        email: String,
        name: String,
        phone: Option<String>,
        password_hash: String,
        now: Timestamp,
    ) -> PendingRegistration {
        PendingRegistration {
            email,
            code: self.generate_code(),
            name,
            phone,
            password_hash,
            created_at: now,
            expires_at: now.plus_seconds(secs_i64(self.ttl_secs)),
            last_sent_at: now,
            failed_attempts: 0,
        }
    }

    /// Returns the seconds left before another code may be sent, if any.
    #[must_use]
    pub fn cooldown_remaining(&self, pending: &PendingRegistration, now: Timestamp) -> Option<u64> {
        let available_at = pending.last_sent_at.plus_seconds(secs_i64(self.resend_cooldown_secs));
        let remaining = now.seconds_until(available_at);
        u64::try_from(remaining).ok().filter(|secs| *secs > 0)
    }

    /// Re-issues a code for an existing registration, enforcing the cooldown.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::RateLimited`] inside the cooldown window.
    pub fn reissue(
        &self,
        pending: &PendingRegistration,
        now: Timestamp,
    ) -> Result<PendingRegistration, DomainError> {
        if let Some(retry_after_secs) = self.cooldown_remaining(pending, now) {
            return Err(DomainError::RateLimited {
                message: format!("Please wait {retry_after_secs} seconds before requesting a new OTP"),
                retry_after_secs,
            });
        }
        Ok(PendingRegistration {
            code: self.generate_code(),
            expires_at: now.plus_seconds(secs_i64(self.ttl_secs)),
            last_sent_at: now,
            failed_attempts: 0,
            ..pending.clone()
        })
    }

    /// Checks a submitted code against a pending registration.
    #[must_use]
    pub fn check(&self, pending: &PendingRegistration, submitted: &str, now: Timestamp) -> OtpCheck {
        if now > pending.expires_at {
            return OtpCheck::Expired;
        }
        if codes_match(&pending.code, submitted.trim()) {
            return OtpCheck::Accepted;
        }
        let attempts = pending.failed_attempts.saturating_add(1);
        if attempts >= self.max_attempts {
            OtpCheck::Exhausted
        } else {
            OtpCheck::Mismatch {
                attempts,
            }
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Compares two codes in constant time.
fn codes_match(expected: &str, submitted: &str) -> bool {
    expected.len() == submitted.len() && bool::from(expected.as_bytes().ct_eq(submitted.as_bytes()))
}

/// Converts configured seconds to a signed offset.
fn secs_i64(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
