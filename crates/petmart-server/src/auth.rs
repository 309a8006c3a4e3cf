// crates/petmart-server/src/auth.rs
// ============================================================================
// Module: Request Authentication
// Description: Bearer token extraction for authenticated routes.
// Purpose: Resolve the calling user from an access token, failing closed.
// Dependencies: axum, petmart-core
// ============================================================================

//! ## Overview
//! [`AuthUser`] is an axum extractor. Handlers that take it only run once the
//! `Authorization: Bearer <token>` header carries a valid, unexpired access
//! token signed by this server. Refresh tokens are rejected here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use petmart_core::UserId;

use crate::error::ApiError;
use crate::service::MarketService;
use crate::token::TokenKind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Upper bound on accepted Authorization header size.
const MAX_AUTH_HEADER_BYTES: usize = 8 * 1024;
/// Message for absent or malformed credentials.
const MISSING_TOKEN: &str = "Missing bearer token";

// ============================================================================
// SECTION: Extractor
// ============================================================================

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Caller's user id.
    pub id: UserId,
    /// Email recorded in the token.
    pub email: String,
}

impl FromRequestParts<Arc<MarketService>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        service: &Arc<MarketService>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let claims = service
            .tokens()
            .verify(token, TokenKind::Access, service.now())
            .map_err(|err| ApiError::unauthenticated(err.to_string()))?;
        let id = claims.user_id().map_err(|err| ApiError::unauthenticated(err.to_string()))?;
        Ok(Self {
            id,
            email: claims.email,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Extracts the token from an `Authorization: Bearer` header.
fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::unauthenticated(MISSING_TOKEN))?;
    if header.len() > MAX_AUTH_HEADER_BYTES {
        return Err(ApiError::unauthenticated(MISSING_TOKEN));
    }
    let mut parts = header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().unwrap_or_default().trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(ApiError::unauthenticated(MISSING_TOKEN));
    }
    Ok(token)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
