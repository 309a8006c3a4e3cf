// crates/petmart-server/src/token.rs
// ============================================================================
// Module: Bearer Tokens
// Description: HS256 JSON Web Token issuance and verification.
// Purpose: Authenticate API callers with short-lived access tokens.
// Dependencies: base64, hmac, petmart-core, rand, serde, serde_json, sha2
// ============================================================================

//! ## Overview
//! Tokens are compact JWTs: `base64url(header).base64url(claims).signature`
//! with an HMAC-SHA256 signature over the first two segments. Verification
//! fails closed and checks, in order, the structure, the `HS256` algorithm,
//! the signature (constant time), the issuer, the token type, and expiry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::Hmac;
use hmac::Mac;
use petmart_core::Timestamp;
use petmart_core::UserId;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Deserialize;
use serde::Serialize;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Only supported signing algorithm.
const ALGORITHM: &str = "HS256";
/// Upper bound on an encoded token.
const MAX_TOKEN_BYTES: usize = 4 * 1024;
/// Random bytes in a token id.
const JTI_BYTES: usize = 16;

/// HMAC-SHA256 instance.
type HmacSha256 = Hmac<Sha256>;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Token purpose carried in the `typ` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Short-lived token accepted on authenticated routes.
    Access,
    /// Long-lived token accepted only by the refresh and logout routes.
    Refresh,
}

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user id as a decimal string.
    pub sub: String,
    /// Subject email.
    pub email: String,
    /// Token purpose.
    pub typ: TokenKind,
    /// Issuer.
    pub iss: String,
    /// Issued-at (unix seconds).
    pub iat: i64,
    /// Expiry (unix seconds).
    pub exp: i64,
    /// Unique token id (hex).
    pub jti: String,
}

impl Claims {
    /// Parses the subject as a user id.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Malformed`] when `sub` is not numeric.
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        self.sub.parse::<i64>().map(UserId::new).map_err(|_| TokenError::Malformed)
    }

    /// Returns the expiry as a timestamp.
    #[must_use]
    pub const fn expires_at(&self) -> Timestamp {
        Timestamp::from_unix_seconds(self.exp)
    }
}

/// JOSE header.
#[derive(Debug, Serialize, Deserialize)]
struct Header {
    /// Signing algorithm.
    alg: String,
    /// Media type.
    typ: String,
}

/// Issued token with its lifetime.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded token.
    pub token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
    /// Token claims.
    pub claims: Claims,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Token verification failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Structure or encoding is invalid.
    #[error("Invalid token")]
    Malformed,
    /// Algorithm is not HS256.
    #[error("Invalid token")]
    UnsupportedAlgorithm,
    /// Signature does not match.
    #[error("Invalid token")]
    BadSignature,
    /// Issuer does not match.
    #[error("Invalid token")]
    WrongIssuer,
    /// Token type does not match the route.
    #[error("Invalid token")]
    WrongKind,
    /// Token lifetime has passed.
    #[error("Token has expired")]
    Expired,
}

// ============================================================================
// SECTION: Signer
// ============================================================================

/// Issues and verifies HS256 tokens.
#[derive(Clone)]
pub struct TokenSigner {
    /// HMAC key.
    secret: Vec<u8>,
    /// Issuer claim.
    issuer: String,
    /// Access token lifetime in seconds.
    access_ttl_secs: u64,
    /// Refresh token lifetime in seconds.
    refresh_ttl_secs: u64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("issuer", &self.issuer)
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Creates a signer.
    #[must_use]
    pub fn new(
        secret: Vec<u8>,
        issuer: impl Into<String>,
        access_ttl_secs: u64,
        refresh_ttl_secs: u64,
    ) -> Self {
        Self {
            secret,
            issuer: issuer.into(),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Returns the lifetime for a token kind.
    #[must_use]
    pub const fn ttl_secs(&self, kind: TokenKind) -> u64 {
        match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        }
    }

    /// Issues a token of `kind` for a user.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Malformed`] when encoding fails.
    pub fn issue(
        &self,
        kind: TokenKind,
        user: UserId,
        email: &str,
        now: Timestamp,
    ) -> Result<IssuedToken, TokenError> {
        let expires_in = self.ttl_secs(kind);
        let claims = Claims {
            sub: user.get().to_string(),
            email: email.to_string(),
            typ: kind,
            iss: self.issuer.clone(),
            iat: now.as_unix_seconds(),
            exp: now.plus_seconds(i64::try_from(expires_in).unwrap_or(i64::MAX)).as_unix_seconds(),
            jti: random_jti(),
        };
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        };
        let header = serde_json::to_vec(&header).map_err(|_| TokenError::Malformed)?;
        let payload = serde_json::to_vec(&claims).map_err(|_| TokenError::Malformed)?;
        let signing_input =
            format!("{}.{}", URL_SAFE_NO_PAD.encode(header), URL_SAFE_NO_PAD.encode(payload));
        let signature = self.sign(signing_input.as_bytes())?;
        Ok(IssuedToken {
            token: format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature)),
            expires_in,
            claims,
        })
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError`] describing the first failed check.
    pub fn verify(
        &self,
        token: &str,
        expected: TokenKind,
        now: Timestamp,
    ) -> Result<Claims, TokenError> {
        if token.len() > MAX_TOKEN_BYTES {
            return Err(TokenError::Malformed);
        }
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (segments.next(), segments.next(), segments.next(), segments.next())
        else {
            return Err(TokenError::Malformed);
        };
        let header_bytes = URL_SAFE_NO_PAD.decode(header).map_err(|_| TokenError::Malformed)?;
        let parsed: Header =
            serde_json::from_slice(&header_bytes).map_err(|_| TokenError::Malformed)?;
        if parsed.alg != ALGORITHM {
            return Err(TokenError::UnsupportedAlgorithm);
        }
        let signature = URL_SAFE_NO_PAD.decode(signature).map_err(|_| TokenError::Malformed)?;
        let signing_input_len = header.len() + 1 + payload.len();
        let mut mac = self.mac()?;
        mac.update(&token.as_bytes()[.. signing_input_len]);
        mac.verify_slice(&signature).map_err(|_| TokenError::BadSignature)?;
        let payload = URL_SAFE_NO_PAD.decode(payload).map_err(|_| TokenError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;
        if claims.iss != self.issuer {
            return Err(TokenError::WrongIssuer);
        }
        if claims.typ != expected {
            return Err(TokenError::WrongKind);
        }
        if claims.exp <= now.as_unix_seconds() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    /// Builds a keyed MAC.
    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|_| TokenError::Malformed)
    }

    /// Signs the JWT signing input.
    fn sign(&self, input: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut mac = self.mac()?;
        mac.update(input);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Generates a random 128-bit hex token id.
fn random_jti() -> String {
    let mut bytes = [0u8; JTI_BYTES];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().fold(String::with_capacity(JTI_BYTES * 2), |mut out, byte| {
        let _ = write!(out, "{byte:02x}");
        out
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
