// crates/petmart-server/src/routes/mod.rs
// ============================================================================
// Module: HTTP Routes
// Description: Router assembly, request extractors, and meta endpoints.
// Purpose: Map the REST surface onto marketplace service operations.
// Dependencies: axum, serde, tokio
// ============================================================================

//! ## Overview
//! Handlers are thin: they extract JSON, path, and query input through the
//! wrappers in this module so every rejection becomes an [`ApiError`]
//! envelope, then call the synchronous service through [`run_blocking`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::routing::get;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::json;
use tokio::runtime::Handle;
use tokio::runtime::RuntimeFlavor;

use crate::error::ApiError;
use crate::error::ApiErrorKind;
use crate::service::MarketService;
use crate::service::NO_INPUT_MESSAGE;

// ============================================================================
// SECTION: Submodules
// ============================================================================

mod accounts;
mod catalog;
mod engagement;
mod seller;
mod shopping;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the full API router over a shared service.
pub fn router(service: Arc<MarketService>) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .merge(accounts::routes())
        .merge(seller::routes())
        .merge(catalog::routes())
        .merge(shopping::routes())
        .merge(engagement::routes())
        .fallback(not_found)
        .with_state(service)
}

/// Welcome message.
async fn welcome() -> Json<Value> {
    Json(json!({ "message": "Welcome to Petmart" }))
}

/// Liveness check.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Envelope for unknown routes.
async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}

// ============================================================================
// SECTION: Blocking
// ============================================================================

/// Runs synchronous service work, shifting to a blocking context when available.
pub(crate) fn run_blocking<T>(work: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(work)
        }
        _ => work(),
    }
}

// ============================================================================
// SECTION: Extractors
// ============================================================================

/// JSON body extractor with enveloped rejections.
pub(crate) struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(&rejection)),
        }
    }
}

/// Maps a JSON rejection onto the API error surface.
fn json_rejection(rejection: &JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::new(ApiErrorKind::PayloadTooLarge, "Request body too large");
    }
    match rejection {
        JsonRejection::MissingJsonContentType(_) => ApiError::validation(NO_INPUT_MESSAGE),
        JsonRejection::JsonSyntaxError(_) => ApiError::validation("Malformed JSON body"),
        JsonRejection::JsonDataError(_) => ApiError::validation(rejection.body_text()),
        _ => ApiError::validation("Invalid request body"),
    }
}

/// Path parameter extractor with enveloped rejections.
pub(crate) struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|_| ApiError::validation("Invalid path parameter"))
    }
}

/// Query string extractor with enveloped rejections.
pub(crate) struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| ApiError::validation(rejection.body_text()))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
