// crates/petmart-server/tests/accounts.rs
// ============================================================================
// Module: Account Flow Tests
// Description: End-to-end tests for registration, OTP, login, and tokens.
// Purpose: Validate the OTP lifecycle, credential handling, and token
//          revocation over real HTTP.
// ============================================================================

//! ## Overview
//! Covers:
//! - Registration, OTP verification, and duplicate emails
//! - OTP expiry, resend cooldowns, and attempt exhaustion
//! - Login failures that do not reveal which field was wrong
//! - Refresh, logout revocation, and token kind separation
//! - Profile reads and updates

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use std::sync::Arc;

use common::PASSWORD;
use common::TestServer;
use serde_json::json;

/// Returns a code of the same length that differs in every digit.
fn wrong_code(code: &str) -> String {
    code.chars()
        .map(|c| {
            let digit = c.to_digit(10).unwrap();
            char::from_digit((digit + 1) % 10, 10).unwrap()
        })
        .collect()
}

// ============================================================================
// SECTION: Registration
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn registration_creates_user_after_otp() {
    let server = TestServer::spawn().await;
    let code = server.start_registration("Ana", "Ana@Example.com").await;
    assert_eq!(code.len(), 6);

    let verified = server
        .post("/auth/verify-otp", None, json!({"email": "ana@example.com", "otp": code}))
        .await;
    assert_eq!(verified.status, 201);
    assert_eq!(verified.data()["email"], "ana@example.com");
    assert!(verified.data().get("password_hash").is_none());

    let again = server
        .post(
            "/auth/register",
            None,
            json!({"name": "Ana", "email": "ana@example.com", "password": PASSWORD}),
        )
        .await;
    assert_eq!(again.status, 409);
    assert_eq!(again.body["status"], "error");
    assert_eq!(again.message(), "Email already registered");
}

#[tokio::test(flavor = "multi_thread")]
async fn accepted_code_cannot_be_replayed() {
    let server = TestServer::spawn().await;
    let code = server.start_registration("Abe", "abe@example.com").await;
    let body = json!({"email": "abe@example.com", "otp": code});
    let verified = server.post("/auth/verify-otp", None, body.clone()).await;
    assert_eq!(verified.status, 201);

    let replayed = server.post("/auth/verify-otp", None, body).await;
    assert_eq!(replayed.status, 400);
    assert_eq!(replayed.message(), "Invalid OTP");
    assert_eq!(server.audit.count("otp_rejected", "no_pending"), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn registration_rejects_missing_fields_and_short_passwords() {
    let server = TestServer::spawn().await;
    let missing = server.post("/auth/register", None, json!({"email": "x@example.com"})).await;
    assert_eq!(missing.status, 400);

    let short = server
        .post(
            "/auth/register",
            None,
            json!({"name": "Bo", "email": "bo@example.com", "password": "short"}),
        )
        .await;
    assert_eq!(short.status, 400);
    assert!(server.outbox.messages().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn expired_otp_is_rejected() {
    let server = TestServer::spawn().await;
    let code = server.start_registration("Cy", "cy@example.com").await;
    server.clock.advance(301);
    let response = server
        .post("/auth/verify-otp", None, json!({"email": "cy@example.com", "otp": code}))
        .await;
    assert_eq!(response.status, 400);
    assert_eq!(response.message(), "OTP has expired");
}

#[tokio::test(flavor = "multi_thread")]
async fn resend_respects_cooldown_and_replaces_code() {
    let server = TestServer::spawn().await;
    let first = server.start_registration("Di", "di@example.com").await;

    let early = server.post("/auth/resend-otp", None, json!({"email": "di@example.com"})).await;
    assert_eq!(early.status, 429);
    assert!(early.body["retry_after_secs"].as_u64().unwrap() > 0);

    let again = server
        .post(
            "/auth/register",
            None,
            json!({"name": "Di", "email": "di@example.com", "password": PASSWORD}),
        )
        .await;
    assert_eq!(again.status, 429);

    server.clock.advance(61);
    let resent = server.post("/auth/resend-otp", None, json!({"email": "di@example.com"})).await;
    assert_eq!(resent.status, 200);
    let second = server.outbox.latest_code_for("di@example.com").unwrap();
    assert_eq!(server.outbox.messages().len(), 2);

    if first != second {
        let stale = server
            .post("/auth/verify-otp", None, json!({"email": "di@example.com", "otp": first}))
            .await;
        assert_eq!(stale.status, 400);
    }
    let verified = server
        .post("/auth/verify-otp", None, json!({"email": "di@example.com", "otp": second}))
        .await;
    assert_eq!(verified.status, 201);
}

#[tokio::test(flavor = "multi_thread")]
async fn resend_without_pending_registration_is_not_found() {
    let server = TestServer::spawn().await;
    let response =
        server.post("/auth/resend-otp", None, json!({"email": "nobody@example.com"})).await;
    assert_eq!(response.status, 404);
}

#[tokio::test(flavor = "multi_thread")]
async fn otp_attempts_are_limited() {
    let server = TestServer::spawn().await;
    let code = server.start_registration("Ed", "ed@example.com").await;
    let wrong = wrong_code(&code);
    for _ in 0 .. 4 {
        let response = server
            .post("/auth/verify-otp", None, json!({"email": "ed@example.com", "otp": wrong}))
            .await;
        assert_eq!(response.status, 400);
        assert_eq!(response.message(), "Invalid OTP");
    }
    let exhausted = server
        .post("/auth/verify-otp", None, json!({"email": "ed@example.com", "otp": wrong}))
        .await;
    assert_eq!(exhausted.message(), "Too many failed attempts");

    let late = server
        .post("/auth/verify-otp", None, json!({"email": "ed@example.com", "otp": code}))
        .await;
    assert_eq!(late.status, 400);
    assert_eq!(late.message(), "Invalid OTP");
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_wrong_codes_share_the_attempt_limit() {
    let server = Arc::new(TestServer::spawn().await);
    let code = server.start_registration("Eli", "eli@example.com").await;
    let wrong = wrong_code(&code);
    let tasks: Vec<_> = (0 .. 40)
        .map(|_| {
            let server = Arc::clone(&server);
            let body = json!({"email": "eli@example.com", "otp": wrong});
            tokio::spawn(async move { server.post("/auth/verify-otp", None, body).await })
        })
        .collect();
    let mut too_many = 0;
    for task in tasks {
        let response = task.await.unwrap();
        assert_eq!(response.status, 400);
        if response.message() == "Too many failed attempts" {
            too_many += 1;
        }
    }
    assert_eq!(too_many, 1);
    assert_eq!(server.audit.count("otp_rejected", "mismatch"), 4);
    assert_eq!(server.audit.count("otp_rejected", "attempts_exhausted"), 1);
    assert_eq!(server.audit.count("otp_rejected", "no_pending"), 35);

    let late = server
        .post("/auth/verify-otp", None, json!({"email": "eli@example.com", "otp": code}))
        .await;
    assert_eq!(late.message(), "Invalid OTP");
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_delivery_discards_pending_registration() {
    let server = TestServer::spawn().await;
    server.outbox.set_failing(true);
    let response = server
        .post(
            "/auth/register",
            None,
            json!({"name": "Fi", "email": "fi@example.com", "password": PASSWORD}),
        )
        .await;
    assert_eq!(response.status, 500);

    server.outbox.set_failing(false);
    let retry = server.start_registration("Fi", "fi@example.com").await;
    assert!(!retry.is_empty());
}

// ============================================================================
// SECTION: Login and Tokens
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn login_failures_share_one_message() {
    let server = TestServer::spawn().await;
    server.signup("Gu", "gu@example.com").await;

    let bad_password = server
        .post("/auth/login", None, json!({"email": "gu@example.com", "password": "wrong-pass"}))
        .await;
    let unknown = server
        .post("/auth/login", None, json!({"email": "ghost@example.com", "password": PASSWORD}))
        .await;
    assert_eq!(bad_password.status, 401);
    assert_eq!(unknown.status, 401);
    assert_eq!(bad_password.message(), unknown.message());
}

#[tokio::test(flavor = "multi_thread")]
async fn protected_routes_require_access_tokens() {
    let server = TestServer::spawn().await;
    let session = server.signup("Hu", "hu@example.com").await;

    assert_eq!(server.get("/users/me", None).await.status, 401);
    assert_eq!(server.get("/users/me", Some("garbage")).await.status, 401);
    assert_eq!(server.get("/users/me", Some(&session.refresh)).await.status, 401);

    let me = server.get("/users/me", Some(&session.access)).await;
    assert_eq!(me.status, 200);
    assert_eq!(me.data()["id"], session.user_id);

    server.clock.advance(901);
    let expired = server.get("/users/me", Some(&session.access)).await;
    assert_eq!(expired.status, 401);
    assert_eq!(expired.message(), "Token has expired");
}

#[tokio::test(flavor = "multi_thread")]
async fn refresh_issues_access_and_logout_revokes() {
    let server = TestServer::spawn().await;
    let session = server.signup("Io", "io@example.com").await;

    let as_refresh =
        server.post("/auth/refresh", None, json!({"refresh_token": session.access})).await;
    assert_eq!(as_refresh.status, 401);

    let refreshed =
        server.post("/auth/refresh", None, json!({"refresh_token": session.refresh})).await;
    assert_eq!(refreshed.status, 200);
    let access = refreshed.data()["access_token"].as_str().unwrap().to_string();
    assert_eq!(server.get("/users/me", Some(&access)).await.status, 200);

    let logout = server
        .post("/auth/logout", Some(&access), json!({"refresh_token": session.refresh}))
        .await;
    assert_eq!(logout.status, 200);

    let revoked =
        server.post("/auth/refresh", None, json!({"refresh_token": session.refresh})).await;
    assert_eq!(revoked.status, 401);
}

#[tokio::test(flavor = "multi_thread")]
async fn logout_rejects_foreign_refresh_tokens() {
    let server = TestServer::spawn().await;
    let owner = server.signup("Jo", "jo@example.com").await;
    let other = server.signup("Ka", "ka@example.com").await;
    let response = server
        .post("/auth/logout", Some(&other.access), json!({"refresh_token": owner.refresh}))
        .await;
    assert_eq!(response.status, 403);

    let still_valid =
        server.post("/auth/refresh", None, json!({"refresh_token": owner.refresh})).await;
    assert_eq!(still_valid.status, 200);
}

// ============================================================================
// SECTION: Profiles
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn profile_updates_validate_fields() {
    let server = TestServer::spawn().await;
    let session = server.signup("Lu", "lu@example.com").await;

    let empty = server.put("/users/me", Some(&session.access), json!({})).await;
    assert_eq!(empty.status, 400);

    let bad_url = server
        .put("/users/me", Some(&session.access), json!({"profile_photo_url": "ftp://x"}))
        .await;
    assert_eq!(bad_url.status, 400);

    let updated = server
        .put(
            "/users/me",
            Some(&session.access),
            json!({"name": "Luna", "address": "1 Cat Street", "phone": "+6281234567890"}),
        )
        .await;
    assert_eq!(updated.status, 200);
    assert_eq!(updated.data()["name"], "Luna");

    let public = server.get(&format!("/users/{}", session.user_id), None).await;
    assert_eq!(public.status, 200);
    assert_eq!(public.data()["name"], "Luna");
    assert!(public.data().get("email").is_none());

    assert_eq!(server.get("/users/999999", None).await.status, 404);
}
