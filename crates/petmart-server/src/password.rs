// crates/petmart-server/src/password.rs
// ============================================================================
// Module: Password Hashing
// Description: PBKDF2-HMAC-SHA256 password hashing and verification.
// Purpose: Store only salted, stretched password hashes.
// Dependencies: base64, pbkdf2, rand, sha2, subtle, thiserror
// ============================================================================

//! ## Overview
//! Hashes are encoded as `pbkdf2-sha256$<iterations>$<salt>$<hash>` with
//! unpadded standard base64 for salt and hash. Verification recomputes the
//! hash with the stored iteration count and compares in constant time.
//! [`PasswordHasher::dummy_verify`] burns the same work for unknown accounts
//! so login timing does not reveal whether an email exists.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Scheme label for encoded hashes.
const SCHEME: &str = "pbkdf2-sha256";
/// Salt length in bytes.
const SALT_LEN: usize = 16;
/// Derived key length in bytes.
const HASH_LEN: usize = 32;
/// Upper bound on iterations accepted from stored hashes.
const MAX_STORED_ITERATIONS: u32 = 10_000_000;
/// Fixed salt used by [`PasswordHasher::dummy_verify`].
const DUMMY_SALT: [u8; SALT_LEN] = [0x5a; SALT_LEN];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Password hash errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Stored hash is not in the expected encoding.
    #[error("malformed password hash")]
    Malformed,
}

// ============================================================================
// SECTION: Hasher
// ============================================================================

/// PBKDF2 password hasher.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    /// Iterations for new hashes.
    iterations: u32,
}

impl PasswordHasher {
    /// Creates a hasher using `iterations` for new hashes.
    #[must_use]
    pub const fn new(iterations: u32) -> Self {
        Self {
            iterations,
        }
    }

    /// Hashes a password with a fresh random salt.
    #[must_use]
    pub fn hash(&self, password: &str) -> String {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let hash = derive(password, &salt, self.iterations);
        format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(hash)
        )
    }

    /// Verifies a password against an encoded hash.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordError::Malformed`] when the stored hash cannot be
    /// decoded.
    pub fn verify(&self, password: &str, encoded: &str) -> Result<bool, PasswordError> {
        let mut parts = encoded.split('$');
        let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) =
            (parts.next(), parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(PasswordError::Malformed);
        };
        if scheme != SCHEME {
            return Err(PasswordError::Malformed);
        }
        let iterations: u32 = iterations.parse().map_err(|_| PasswordError::Malformed)?;
        if iterations == 0 || iterations > MAX_STORED_ITERATIONS {
            return Err(PasswordError::Malformed);
        }
        let salt = STANDARD_NO_PAD.decode(salt).map_err(|_| PasswordError::Malformed)?;
        let expected = STANDARD_NO_PAD.decode(expected).map_err(|_| PasswordError::Malformed)?;
        if expected.len() != HASH_LEN {
            return Err(PasswordError::Malformed);
        }
        let actual = derive(password, &salt, iterations);
        Ok(bool::from(actual.as_slice().ct_eq(expected.as_slice())))
    }

    /// Performs a throwaway derivation with the configured cost.
    pub fn dummy_verify(&self, password: &str) {
        let _ = derive(password, &DUMMY_SALT, self.iterations);
    }
}

/// Derives the PBKDF2-HMAC-SHA256 key.
fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

// ============================================================================
// SECTION: Tests
// ============================================================================
