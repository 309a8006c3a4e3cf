// crates/petmart-server/src/error.rs
// ============================================================================
// Module: API Errors and Envelopes
// Description: Error kinds, status mapping, and JSON response envelopes.
// Purpose: Give every handler one consistent success and error body.
// Dependencies: axum, petmart-core, serde, thiserror
// ============================================================================

//! ## Overview
//! Every response body is an envelope. Successes carry
//! `{"status":"success","message":...,"data":...}` and failures carry
//! `{"status":"error","message":...}` plus `retry_after_secs` when the
//! caller is rate limited. Internal failures are redacted to a generic
//! message so store details never reach clients.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use petmart_core::DomainError;
use petmart_core::StoreError;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Message returned in place of internal error details.
const INTERNAL_MESSAGE: &str = "Internal server error";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Classification that decides the HTTP status of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Malformed or invalid input (400).
    Validation,
    /// Missing or invalid credentials (401).
    Unauthenticated,
    /// Authenticated but not permitted (403).
    Forbidden,
    /// Unknown or invisible record (404).
    NotFound,
    /// Conflicts with existing state (409).
    Conflict,
    /// Request body over the configured limit (413).
    PayloadTooLarge,
    /// Action attempted too soon (429).
    TooManyRequests,
    /// Unexpected failure (500).
    Internal,
}

impl ApiErrorKind {
    /// Returns the HTTP status for this kind.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Handler-facing error with a user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Error classification.
    pub kind: ApiErrorKind,
    /// User-visible message.
    pub message: String,
    /// Seconds until a rate-limited action may be retried.
    pub retry_after_secs: Option<u64>,
}

impl ApiError {
    /// Builds an error of the given kind.
    #[must_use]
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retry_after_secs: None,
        }
    }

    /// Builds a 400 error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    /// Builds a 401 error.
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Unauthenticated, message)
    }

    /// Builds a 403 error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Forbidden, message)
    }

    /// Builds a 404 error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::NotFound, message)
    }

    /// Builds a 409 error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Conflict, message)
    }

    /// Builds a redacted 500 error.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(ApiErrorKind::Internal, INTERNAL_MESSAGE)
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.kind.status()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(message) => Self::validation(message),
            DomainError::NotFound(message) => Self::not_found(message),
            DomainError::Forbidden(message) => Self::forbidden(message),
            DomainError::Conflict(message) => Self::conflict(message),
            DomainError::RateLimited {
                message,
                retry_after_secs,
            } => Self {
                kind: ApiErrorKind::TooManyRequests,
                message,
                retry_after_secs: Some(retry_after_secs),
            },
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) => Self::conflict(message),
            StoreError::NotFound(message) => Self::not_found(message),
            StoreError::Rejected(domain) => domain.into(),
            StoreError::Io(_)
            | StoreError::Db(_)
            | StoreError::Invalid(_)
            | StoreError::VersionMismatch(_) => Self::internal(),
        }
    }
}

// ============================================================================
// SECTION: Envelopes
// ============================================================================

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    /// Always `error`.
    status: &'static str,
    /// User-visible message.
    message: &'a str,
    /// Retry hint for rate-limited calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_secs: Option<u64>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: "error",
            message: &self.message,
            retry_after_secs: self.retry_after_secs,
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Success response with a payload.
#[derive(Debug)]
pub struct ApiSuccess<T> {
    /// HTTP status to return.
    pub status: StatusCode,
    /// User-visible message.
    pub message: String,
    /// Response payload.
    pub data: T,
}

impl<T> ApiSuccess<T> {
    /// Builds a 200 response.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            data,
        }
    }

    /// Builds a 201 response.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: message.into(),
            data,
        }
    }
}

/// Success response body.
#[derive(Debug, Serialize)]
struct SuccessBody<'a, T> {
    /// Always `success`.
    status: &'static str,
    /// User-visible message.
    message: &'a str,
    /// Response payload.
    data: &'a T,
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        let body = SuccessBody {
            status: "success",
            message: &self.message,
            data: &self.data,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Result type returned by handlers.
pub type ApiResult<T> = Result<ApiSuccess<T>, ApiError>;

// ============================================================================
// SECTION: Tests
// ============================================================================
