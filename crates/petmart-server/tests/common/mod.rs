// crates/petmart-server/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared harness for end-to-end HTTP tests.
// Purpose: Spawn a server on an ephemeral port with a manual clock and an
//          in-memory outbox, and drive it with a JSON client.
// Dependencies: petmart-server, petmart-core, petmart-store-sqlite, reqwest
// ============================================================================

//! ## Overview
//! [`TestServer::spawn`] starts a real listener on `127.0.0.1:0` backed by
//! an in-memory SQLite store. The clock is manual so OTP expiry, cooldowns,
//! and promotion windows are deterministic, and OTP codes are read back from
//! a [`MemoryOutbox`] instead of a mailbox.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use petmart_config::PetmartConfig;
use petmart_core::ManualClock;
use petmart_core::Timestamp;
use petmart_server::AccountAuditEvent;
use petmart_server::AuditSink;
use petmart_server::HttpAuditEvent;
use petmart_server::MarketServer;
use petmart_server::MemoryOutbox;
use petmart_store_sqlite::SqliteMarketStore;
use reqwest::Client;
use reqwest::Method;
use serde_json::Value;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Start of test time: 2023-11-14T22:13:20Z.
pub const T0: Timestamp = Timestamp::from_unix_seconds(1_700_000_000);
/// Password used by every fixture account.
pub const PASSWORD: &str = "correct-horse-battery";
/// Inline signing secret for tests.
const TEST_SECRET: &str = "petmart-test-secret-0123456789abcdef";
/// Body limit for tests.
pub const TEST_MAX_BODY_BYTES: usize = 16 * 1024;

// ============================================================================
// SECTION: Server Harness
// ============================================================================

/// Running server plus handles to its clock and outbox.
pub struct TestServer {
    /// Base URL, without a trailing slash.
    pub base_url: String,
    /// Clock shared with the server.
    pub clock: Arc<ManualClock>,
    /// Outbox shared with the server.
    pub outbox: Arc<MemoryOutbox>,
    /// Account audit events recorded by the server.
    pub audit: Arc<RecordingAuditSink>,
    /// HTTP client.
    client: Client,
    /// Server task.
    task: JoinHandle<()>,
}

/// Audit sink that keeps account events in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    /// Recorded account events, oldest first.
    accounts: Mutex<Vec<AccountAuditEvent>>,
}

impl RecordingAuditSink {
    /// Counts account events with the given action and reason.
    pub fn count(&self, action: &str, reason: &str) -> usize {
        self.accounts
            .lock()
            .expect("audit lock")
            .iter()
            .filter(|event| event.action == action && event.reason.as_deref() == Some(reason))
            .count()
    }
}

impl AuditSink for RecordingAuditSink {
    fn record_http(&self, _event: &HttpAuditEvent) {}

    fn record_account(&self, event: &AccountAuditEvent) {
        self.accounts.lock().expect("audit lock").push(event.clone());
    }
}

/// Status and decoded JSON body of a response.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: u16,
    /// JSON body, or `Null` when the body is not JSON.
    pub body: Value,
}

impl TestResponse {
    /// Returns the `data` member of a success envelope.
    #[must_use]
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// Returns the `message` member of the envelope.
    #[must_use]
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

/// Returns the configuration used by the harness.
#[must_use]
pub fn test_config() -> PetmartConfig {
    let mut config = PetmartConfig::default();
    config.server.bind = "127.0.0.1:0".to_string();
    config.server.max_body_bytes = TEST_MAX_BODY_BYTES;
    config.auth.jwt_secret = Some(TEST_SECRET.to_string());
    config.auth.password_iterations = 1_000;
    config.audit.enabled = false;
    config
}

impl TestServer {
    /// Starts a server with the default test configuration.
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    /// Starts a server with a caller-provided configuration.
    pub async fn spawn_with(config: PetmartConfig) -> Self {
        let clock = Arc::new(ManualClock::new(T0));
        let outbox = Arc::new(MemoryOutbox::new());
        let audit = Arc::new(RecordingAuditSink::default());
        let store = Arc::new(SqliteMarketStore::in_memory().expect("in-memory store"));
        let server = MarketServer::with_parts(
            config,
            store,
            clock.clone(),
            outbox.clone(),
            audit.clone(),
        )
        .expect("server");
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let task = tokio::spawn(async move {
            let _ = server.serve_on(listener).await;
        });
        Self {
            base_url: format!("http://{addr}"),
            clock,
            outbox,
            audit,
            client: Client::new(),
            task,
        }
    }

    /// Sends a request with an optional bearer token and JSON body.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = self.client.request(method, format!("{}{path}", self.base_url));
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        let response = builder.send().await.expect("send request");
        read_response(response).await
    }

    /// Sends a raw body with an explicit content type.
    pub async fn request_raw(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        content_type: &str,
        body: Vec<u8>,
    ) -> TestResponse {
        let mut builder = self
            .client
            .request(method, format!("{}{path}", self.base_url))
            .header("content-type", content_type)
            .body(body);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        let response = builder.send().await.expect("send request");
        read_response(response).await
    }

    /// `GET` helper.
    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, path, token, None).await
    }

    /// `POST` helper.
    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, path, token, Some(body)).await
    }

    /// `PUT` helper.
    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    /// `DELETE` helper.
    pub async fn delete(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, path, token, None).await
    }

    /// Starts a registration and returns the delivered OTP code.
    pub async fn start_registration(&self, name: &str, email: &str) -> String {
        let response = self
            .post(
                "/auth/register",
                None,
                json!({"name": name, "email": email, "password": PASSWORD}),
            )
            .await;
        assert_eq!(response.status, 200, "register failed: {:?}", response.body);
        self.outbox.latest_code_for(&email.to_ascii_lowercase()).expect("otp delivered")
    }

    /// Registers, verifies, and logs in a user.
    pub async fn signup(&self, name: &str, email: &str) -> Session {
        let code = self.start_registration(name, email).await;
        let verified =
            self.post("/auth/verify-otp", None, json!({"email": email, "otp": code})).await;
        assert_eq!(verified.status, 201, "verify failed: {:?}", verified.body);
        let id = verified.data()["id"].as_i64().expect("user id");
        self.login(email, id).await
    }

    /// Logs in an existing user.
    pub async fn login(&self, email: &str, id: i64) -> Session {
        let response =
            self.post("/auth/login", None, json!({"email": email, "password": PASSWORD})).await;
        assert_eq!(response.status, 200, "login failed: {:?}", response.body);
        Session {
            user_id: id,
            access: response.data()["access_token"].as_str().expect("access").to_string(),
            refresh: response.data()["refresh_token"].as_str().expect("refresh").to_string(),
        }
    }

    /// Signs up a user and registers a storefront for them.
    pub async fn seller(&self, name: &str, email: &str, domain: &str) -> Session {
        let session = self.signup(name, email).await;
        let response = self
            .post(
                "/seller/register",
                Some(&session.access),
                json!({
                    "name": format!("{name} Pets"),
                    "domain": domain,
                    "address": "1 Pet Lane"
                }),
            )
            .await;
        assert_eq!(response.status, 201, "store failed: {:?}", response.body);
        session
    }

    /// Creates a product and returns its id.
    pub async fn product(&self, seller: &Session, name: &str, price: f64, stock: i64) -> i64 {
        let response = self
            .post(
                "/seller/products",
                Some(&seller.access),
                json!({
                    "name": name,
                    "description": format!("{name} for happy pets"),
                    "price": price,
                    "stock": stock,
                    "category": "food",
                    "animal_type": "cat",
                    "images": ["https://img.example.com/a.png"]
                }),
            )
            .await;
        assert_eq!(response.status, 201, "product failed: {:?}", response.body);
        response.data()["id"].as_i64().expect("product id")
    }

    /// Checks out explicit lines and returns the order id.
    pub async fn checkout(&self, buyer: &Session, lines: Value) -> TestResponse {
        self.post("/orders/checkout", Some(&buyer.access), json!({"products": lines})).await
    }

    /// Moves an order through the seller lifecycle to `Completed`.
    pub async fn complete_order(&self, seller: &Session, order_id: i64) {
        for status in ["Processing", "Completed"] {
            let response = self
                .put(
                    &format!("/seller/orders/{order_id}/status"),
                    Some(&seller.access),
                    json!({"status": status}),
                )
                .await;
            assert_eq!(response.status, 200, "status {status} failed: {:?}", response.body);
        }
    }

    /// Returns a product's current stock from the public catalog.
    pub async fn stock_of(&self, product_id: i64) -> i64 {
        let response = self.get(&format!("/products/{product_id}"), None).await;
        assert_eq!(response.status, 200);
        response.data()["stock"].as_i64().expect("stock")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Authenticated fixture account.
#[derive(Debug, Clone)]
pub struct Session {
    /// User id.
    pub user_id: i64,
    /// Access token.
    pub access: String,
    /// Refresh token.
    pub refresh: String,
}

/// Decodes a response into status plus JSON.
async fn read_response(response: reqwest::Response) -> TestResponse {
    let status = response.status().as_u16();
    let bytes = response.bytes().await.expect("read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    TestResponse {
        status,
        body,
    }
}
