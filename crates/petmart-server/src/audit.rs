// crates/petmart-server/src/audit.rs
// ============================================================================
// Module: Petmart Audit Logging
// Description: Structured audit events for HTTP requests and account actions.
// Purpose: Emit redacted JSON-line audit logs without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Audit events are serialized as one JSON object per line. Sinks write to
//! stderr, to an append-only file, or nowhere. Account events identify the
//! subject by email or user id only; passwords, OTP codes, and tokens are
//! never recorded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// HTTP request audit event.
#[derive(Debug, Clone, Serialize)]
pub struct HttpAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// HTTP method.
    pub method: String,
    /// Request path without the query string.
    pub path: String,
    /// Response status code.
    pub status: u16,
    /// Handling latency in milliseconds.
    pub latency_ms: u128,
    /// Peer IP address when available.
    pub peer_ip: Option<String>,
}

impl HttpAuditEvent {
    /// Creates a request event stamped with the current time.
    #[must_use]
    pub fn new(
        method: String,
        path: String,
        status: u16,
        latency_ms: u128,
        peer_ip: Option<String>,
    ) -> Self {
        Self {
            event: "http_request",
            timestamp_ms: now_ms(),
            method,
            path,
            status,
            latency_ms,
            peer_ip,
        }
    }
}

/// Account security audit event.
#[derive(Debug, Clone, Serialize)]
pub struct AccountAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Account action label (for example `login_failed`).
    pub action: &'static str,
    /// Subject email when known.
    pub email: Option<String>,
    /// Subject user id when known.
    pub user_id: Option<i64>,
    /// Short reason label.
    pub reason: Option<String>,
}

impl AccountAuditEvent {
    /// Creates an account event for an email subject.
    #[must_use]
    pub fn for_email(action: &'static str, email: &str, reason: Option<&str>) -> Self {
        Self {
            event: "account_audit",
            timestamp_ms: now_ms(),
            action,
            email: Some(email.to_string()),
            user_id: None,
            reason: reason.map(str::to_string),
        }
    }

    /// Creates an account event for a known user.
    #[must_use]
    pub fn for_user(action: &'static str, user_id: i64, reason: Option<&str>) -> Self {
        Self {
            event: "account_audit",
            timestamp_ms: now_ms(),
            action,
            email: None,
            user_id: Some(user_id),
            reason: reason.map(str::to_string),
        }
    }
}

/// Milliseconds since the unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for request and account events.
pub trait AuditSink: Send + Sync {
    /// Record an HTTP request event.
    fn record_http(&self, event: &HttpAuditEvent);

    /// Record an account event.
    fn record_account(&self, event: &AccountAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record_http(&self, event: &HttpAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_account(&self, event: &AccountAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event.
    fn write_line(&self, payload: &str) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_http(&self, event: &HttpAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            self.write_line(&payload);
        }
    }

    fn record_account(&self, event: &AccountAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            self.write_line(&payload);
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_http(&self, _event: &HttpAuditEvent) {}

    fn record_account(&self, _event: &AccountAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn file_sink_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let sink = FileAuditSink::new(&path).unwrap();
        sink.record_account(&AccountAuditEvent::for_email(
            "login_failed",
            "kim@example.com",
            Some("bad_password"),
        ));
        sink.record_http(&HttpAuditEvent::new(
            "GET".to_string(),
            "/health".to_string(),
            200,
            1,
            Some("127.0.0.1".to_string()),
        ));
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> =
            content.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "account_audit");
        assert_eq!(lines[0]["action"], "login_failed");
        assert_eq!(lines[1]["event"], "http_request");
        assert_eq!(lines[1]["status"], 200);
    }
}
