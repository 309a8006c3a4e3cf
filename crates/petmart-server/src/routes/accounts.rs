// crates/petmart-server/src/routes/accounts.rs
// ============================================================================
// Module: Account Routes
// Description: Registration, login, token, and profile endpoints.
// Purpose: Expose account services under /auth and /users.
// Dependencies: axum
// ============================================================================

//! Registration, session, and profile handlers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::routing::get;
use axum::routing::post;
use petmart_core::PublicProfile;
use petmart_core::User;
use petmart_core::UserId;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::error::ApiResult;
use crate::error::ApiSuccess;
use crate::routes::ApiJson;
use crate::routes::ApiPath;
use crate::routes::run_blocking;
use crate::service::MarketService;
use crate::service::accounts::AccessToken;
use crate::service::accounts::LoginRequest;
use crate::service::accounts::RefreshRequest;
use crate::service::accounts::RegisterRequest;
use crate::service::accounts::RegistrationView;
use crate::service::accounts::ResendOtpRequest;
use crate::service::accounts::TokenPair;
use crate::service::accounts::UpdateProfileRequest;
use crate::service::accounts::VerifyOtpRequest;

// ============================================================================
// SECTION: Router
// ============================================================================

/// Account and user routes.
pub(super) fn routes() -> Router<Arc<MarketService>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/resend-otp", post(resend_otp))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/users/me", get(me).put(update_me))
        .route("/users/{id}", get(get_user))
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `POST /auth/register`
async fn register(
    State(service): State<Arc<MarketService>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> ApiResult<RegistrationView> {
    let view = run_blocking(|| service.register(&request))?;
    Ok(ApiSuccess::ok("OTP sent to email. Please verify to complete registration", view))
}

/// `POST /auth/verify-otp`
async fn verify_otp(
    State(service): State<Arc<MarketService>>,
    ApiJson(request): ApiJson<VerifyOtpRequest>,
) -> ApiResult<User> {
    let user = run_blocking(|| service.verify_otp(&request))?;
    Ok(ApiSuccess::created("User registered successfully", user))
}

/// `POST /auth/resend-otp`
async fn resend_otp(
    State(service): State<Arc<MarketService>>,
    ApiJson(request): ApiJson<ResendOtpRequest>,
) -> ApiResult<RegistrationView> {
    let view = run_blocking(|| service.resend_otp(&request))?;
    Ok(ApiSuccess::ok("OTP resent successfully", view))
}

/// `POST /auth/login`
async fn login(
    State(service): State<Arc<MarketService>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<TokenPair> {
    let tokens = run_blocking(|| service.login(&request))?;
    Ok(ApiSuccess::ok("Login successful", tokens))
}

/// `POST /auth/refresh`
async fn refresh(
    State(service): State<Arc<MarketService>>,
    ApiJson(request): ApiJson<RefreshRequest>,
) -> ApiResult<AccessToken> {
    let token = run_blocking(|| service.refresh(&request))?;
    Ok(ApiSuccess::ok("Token refreshed", token))
}

/// `POST /auth/logout`; the body is optional.
async fn logout(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    body: Bytes,
) -> ApiResult<()> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        RefreshRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|_| ApiError::validation("Malformed JSON body"))?
    };
    run_blocking(|| service.logout(caller.id, &request))?;
    Ok(ApiSuccess::ok("Logged out", ()))
}

/// `GET /users/me`
async fn me(State(service): State<Arc<MarketService>>, caller: AuthUser) -> ApiResult<User> {
    let user = run_blocking(|| service.me(caller.id))?;
    Ok(ApiSuccess::ok("User profile", user))
}

/// `PUT /users/me`
async fn update_me(
    State(service): State<Arc<MarketService>>,
    caller: AuthUser,
    ApiJson(request): ApiJson<UpdateProfileRequest>,
) -> ApiResult<User> {
    let user = run_blocking(|| service.update_me(caller.id, &request))?;
    Ok(ApiSuccess::ok("Profile updated", user))
}

/// `GET /users/{id}`
async fn get_user(
    State(service): State<Arc<MarketService>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<PublicProfile> {
    let profile = run_blocking(|| service.public_profile(UserId::new(id)))?;
    Ok(ApiSuccess::ok("User profile", profile))
}
