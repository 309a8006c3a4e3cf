// crates/petmart-server/src/server.rs
// ============================================================================
// Module: Petmart Server
// Description: Server assembly from configuration and the HTTP listener loop.
// Purpose: Build the store, notifier, audit sink, and service, then serve.
// Dependencies: axum, petmart-config, petmart-core, petmart-store-sqlite, tokio
// ============================================================================

//! ## Overview
//! [`MarketServer::from_config`] validates configuration and builds every
//! runtime dependency. [`MarketServer::with_parts`] accepts prebuilt store,
//! clock, notifier, and audit sink so tests can drive time and capture OTP
//! codes. Every request passes through an audit middleware and a body size
//! limit before reaching the router.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::ConnectInfo;
use axum::extract::DefaultBodyLimit;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::middleware::from_fn_with_state;
use axum::response::Response;
use petmart_config::MailDelivery;
use petmart_config::PetmartConfig;
use petmart_config::StoreType;
use petmart_core::Clock;
use petmart_core::MarketStore;
use petmart_core::OtpPolicy;
use petmart_core::SystemClock;
use petmart_store_sqlite::SqliteMarketStore;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::audit::AuditSink;
use crate::audit::FileAuditSink;
use crate::audit::HttpAuditEvent;
use crate::audit::NoopAuditSink;
use crate::audit::StderrAuditSink;
use crate::notify::FileOutboxNotifier;
use crate::notify::LogOtpNotifier;
use crate::notify::OtpNotifier;
use crate::password::PasswordHasher;
use crate::routes;
use crate::service::MarketService;
use crate::service::MarketServiceParts;
use crate::token::TokenSigner;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization failure.
    #[error("init error: {0}")]
    Init(String),
    /// Transport failure.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Petmart HTTP server.
pub struct MarketServer {
    /// Validated configuration.
    config: PetmartConfig,
    /// Shared marketplace service.
    service: Arc<MarketService>,
    /// Audit sink for request events.
    audit: Arc<dyn AuditSink>,
}

impl MarketServer {
    /// Builds a server and its dependencies from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid or a dependency
    /// cannot be opened.
    pub fn from_config(config: PetmartConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let store = build_store(&config)?;
        let audit = build_audit_sink(&config)?;
        let notifier = build_notifier(&config, Arc::clone(&audit))?;
        Self::with_parts(config, store, Arc::new(SystemClock), notifier, audit)
    }

    /// Builds a server from configuration and prebuilt dependencies.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] when configuration is invalid.
    pub fn with_parts(
        config: PetmartConfig,
        store: Arc<dyn MarketStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn OtpNotifier>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let secret =
            config.auth.resolve_secret().map_err(|err| ServerError::Config(err.to_string()))?;
        let tokens = TokenSigner::new(
            secret,
            config.auth.issuer.clone(),
            config.auth.access_token_ttl_secs,
            config.auth.refresh_token_ttl_secs,
        );
        let otp = OtpPolicy {
            ttl_secs: config.otp.ttl_secs,
            resend_cooldown_secs: config.otp.resend_cooldown_secs,
            max_attempts: config.otp.max_attempts,
            code_length: config.otp.code_length,
        };
        let service = Arc::new(MarketService::new(MarketServiceParts {
            store,
            clock,
            tokens,
            passwords: PasswordHasher::new(config.auth.password_iterations),
            otp,
            notifier,
            audit: Arc::clone(&audit),
            sender: config.mail.sender.clone(),
        }));
        Ok(Self {
            config,
            service,
            audit,
        })
    }

    /// Returns the shared service.
    #[must_use]
    pub fn service(&self) -> Arc<MarketService> {
        Arc::clone(&self.service)
    }

    /// Builds the HTTP application with audit and body limit layers.
    #[must_use]
    pub fn router(&self) -> Router {
        routes::router(Arc::clone(&self.service))
            .layer(DefaultBodyLimit::max(self.config.server.max_body_bytes))
            .layer(from_fn_with_state(Arc::clone(&self.audit), audit_requests))
    }

    /// Binds the configured address and serves until failure.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr =
            self.config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
        self.serve_on(listener).await
    }

    /// Serves on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Transport`] when the server fails.
    pub async fn serve_on(self, listener: TcpListener) -> Result<(), ServerError> {
        let app = self.router();
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|_| ServerError::Transport("http server failed".to_string()))
    }
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Opens the configured store.
fn build_store(config: &PetmartConfig) -> Result<Arc<dyn MarketStore>, ServerError> {
    let store = match config.store.store_type {
        StoreType::Memory => {
            SqliteMarketStore::in_memory().map_err(|err| ServerError::Init(err.to_string()))?
        }
        StoreType::Sqlite => {
            let sqlite_config = config
                .store
                .sqlite_config()
                .ok_or_else(|| ServerError::Config("sqlite store requires path".to_string()))?;
            SqliteMarketStore::open(&sqlite_config)
                .map_err(|err| ServerError::Init(err.to_string()))?
        }
    };
    Ok(Arc::new(store))
}

/// Builds the configured audit sink.
fn build_audit_sink(config: &PetmartConfig) -> Result<Arc<dyn AuditSink>, ServerError> {
    if !config.audit.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &config.audit.path {
        Some(path) => {
            let sink = FileAuditSink::new(path)
                .map_err(|err| ServerError::Init(format!("audit log: {err}")))?;
            Ok(Arc::new(sink))
        }
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

/// Builds the configured OTP notifier.
fn build_notifier(
    config: &PetmartConfig,
    audit: Arc<dyn AuditSink>,
) -> Result<Arc<dyn OtpNotifier>, ServerError> {
    match config.mail.delivery {
        MailDelivery::Log => Ok(Arc::new(LogOtpNotifier::new(audit))),
        MailDelivery::File => {
            let path = config.mail.outbox_path.as_ref().ok_or_else(|| {
                ServerError::Config("file mail delivery requires outbox_path".to_string())
            })?;
            let notifier = FileOutboxNotifier::new(path)
                .map_err(|err| ServerError::Init(format!("mail outbox: {err}")))?;
            Ok(Arc::new(notifier))
        }
    }
}

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Records one audit event per request.
async fn audit_requests(
    State(audit): State<Arc<dyn AuditSink>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let peer_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(peer)| peer.ip().to_string());
    let started = Instant::now();
    let response = next.run(request).await;
    audit.record_http(&HttpAuditEvent::new(
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis(),
        peer_ip,
    ));
    response
}
