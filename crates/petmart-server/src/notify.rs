// crates/petmart-server/src/notify.rs
// ============================================================================
// Module: OTP Delivery
// Description: Pluggable delivery of registration one-time passcodes.
// Purpose: Send OTP codes without binding the server to a mail provider.
// Dependencies: petmart-core, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`OtpNotifier`] implementations decide where a code goes:
//! - [`LogOtpNotifier`] records the delivery in the audit log, without the code.
//! - [`FileOutboxNotifier`] appends the full message as a JSON line to a file.
//! - [`MemoryOutbox`] keeps messages in memory for tests and embedding.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use petmart_core::Timestamp;
use serde::Serialize;
use thiserror::Error;

use crate::audit::AccountAuditEvent;
use crate::audit::AuditSink;

// ============================================================================
// SECTION: Types
// ============================================================================

/// One OTP message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpMessage {
    /// Sender address.
    pub from: String,
    /// Recipient email.
    pub to: String,
    /// Recipient display name.
    pub name: String,
    /// Subject line.
    pub subject: String,
    /// Numeric code.
    pub code: String,
    /// Code expiry.
    pub expires_at: Timestamp,
}

/// OTP delivery errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Delivery channel failed.
    #[error("otp delivery failed: {0}")]
    Delivery(String),
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Delivers OTP messages.
pub trait OtpNotifier: Send + Sync {
    /// Delivers one message.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] when the message could not be handed off.
    fn deliver(&self, message: &OtpMessage) -> Result<(), NotifyError>;
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

/// Notifier that records deliveries in the audit log.
pub struct LogOtpNotifier {
    /// Audit destination.
    audit: Arc<dyn AuditSink>,
}

impl LogOtpNotifier {
    /// Creates a notifier writing to `audit`.
    #[must_use]
    pub fn new(audit: Arc<dyn AuditSink>) -> Self {
        Self {
            audit,
        }
    }
}

impl OtpNotifier for LogOtpNotifier {
    fn deliver(&self, message: &OtpMessage) -> Result<(), NotifyError> {
        self.audit.record_account(&AccountAuditEvent::for_email(
            "otp_delivered",
            &message.to,
            Some("log_delivery"),
        ));
        Ok(())
    }
}

/// Notifier appending JSON lines to an outbox file.
pub struct FileOutboxNotifier {
    /// Outbox file opened for append.
    file: Mutex<std::fs::File>,
}

impl FileOutboxNotifier {
    /// Opens the outbox in append mode.
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
}

impl OtpNotifier for FileOutboxNotifier {
    fn deliver(&self, message: &OtpMessage) -> Result<(), NotifyError> {
        let payload =
            serde_json::to_string(message).map_err(|err| NotifyError::Delivery(err.to_string()))?;
        let mut file =
            self.file.lock().map_err(|_| NotifyError::Delivery("outbox poisoned".to_string()))?;
        writeln!(file, "{payload}").map_err(|err| NotifyError::Delivery(err.to_string()))?;
        file.flush().map_err(|err| NotifyError::Delivery(err.to_string()))
    }
}

/// In-memory outbox.
#[derive(Default)]
pub struct MemoryOutbox {
    /// Delivered messages, oldest first.
    messages: Mutex<Vec<OtpMessage>>,
    /// When set, deliveries fail.
    failing: AtomicBool,
}

impl MemoryOutbox {
    /// Creates an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent deliveries fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns every delivered message.
    #[must_use]
    pub fn messages(&self) -> Vec<OtpMessage> {
        self.messages.lock().map(|messages| messages.clone()).unwrap_or_default()
    }

    /// Returns the most recent code sent to `email`.
    #[must_use]
    pub fn latest_code_for(&self, email: &str) -> Option<String> {
        self.messages
            .lock()
            .ok()?
            .iter()
            .rev()
            .find(|message| message.to == email)
            .map(|message| message.code.clone())
    }
}

impl OtpNotifier for MemoryOutbox {
    fn deliver(&self, message: &OtpMessage) -> Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Delivery("outbox unavailable".to_string()));
        }
        self.messages
            .lock()
            .map_err(|_| NotifyError::Delivery("outbox poisoned".to_string()))?
            .push(message.clone());
        Ok(())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
