// crates/petmart-server/src/lib.rs
// ============================================================================
// Module: Petmart Server Library
// Description: HTTP API, authentication, and marketplace services.
// Purpose: Expose the Petmart marketplace over a JSON REST surface.
// Dependencies: axum, petmart-core, petmart-config, petmart-store-sqlite
// ============================================================================

//! ## Overview
//! `petmart-server` wires the domain core and a [`petmart_core::MarketStore`]
//! into an axum router. Services are synchronous and run in a blocking
//! context; handlers translate JSON in and out and map every failure through
//! [`ApiError`]. Security posture: request bodies and tokens are untrusted,
//! passwords are stored as PBKDF2 hashes, and audit events never carry
//! secrets.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod auth;
pub mod error;
pub mod notify;
pub mod password;
pub mod routes;
pub mod server;
pub mod service;
pub mod token;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AccountAuditEvent;
pub use audit::AuditSink;
pub use audit::FileAuditSink;
pub use audit::HttpAuditEvent;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use auth::AuthUser;
pub use error::ApiError;
pub use error::ApiErrorKind;
pub use notify::FileOutboxNotifier;
pub use notify::LogOtpNotifier;
pub use notify::MemoryOutbox;
pub use notify::NotifyError;
pub use notify::OtpMessage;
pub use notify::OtpNotifier;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use server::MarketServer;
pub use server::ServerError;
pub use service::MarketService;
pub use service::MarketServiceParts;
pub use token::Claims;
pub use token::TokenError;
pub use token::TokenKind;
pub use token::TokenSigner;
