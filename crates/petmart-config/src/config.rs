// crates/petmart-config/src/config.rs
// ============================================================================
// Module: Petmart Configuration
// Description: Configuration loading and validation for the Petmart server.
// Purpose: Provide strict, fail-closed config parsing with built-in defaults.
// Dependencies: petmart-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! This module loads `petmart.toml`, applies defaults for every section, and
//! validates the result before the server starts. Invalid values are rejected
//! with a message naming the offending field.
//!
//! The JWT signing secret is either inline (`auth.jwt_secret`) or read from
//! an environment variable named by `auth.jwt_secret_env`; exactly one of the
//! two must be present and the resolved secret must be at least
//! [`MIN_JWT_SECRET_BYTES`] long.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use petmart_store_sqlite::SqliteStoreConfig;
use petmart_store_sqlite::SqliteStoreMode;
use petmart_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits and Defaults
// ============================================================================

/// Default config file name.
pub const DEFAULT_CONFIG_NAME: &str = "petmart.toml";
/// Environment variable for config path.
pub const CONFIG_ENV_VAR: &str = "PETMART_CONFIG";
/// Maximum size of a config file in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total length of a path string.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Minimum length of the resolved JWT signing secret.
pub const MIN_JWT_SECRET_BYTES: usize = 32;
/// Default HTTP bind address.
pub(crate) const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Default request body limit in bytes.
pub(crate) const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Default access token lifetime.
pub(crate) const DEFAULT_ACCESS_TOKEN_TTL_SECS: u64 = 900;
/// Minimum access token lifetime.
pub(crate) const MIN_ACCESS_TOKEN_TTL_SECS: u64 = 60;
/// Maximum access token lifetime.
pub(crate) const MAX_ACCESS_TOKEN_TTL_SECS: u64 = 86_400;
/// Default refresh token lifetime (7 days).
pub(crate) const DEFAULT_REFRESH_TOKEN_TTL_SECS: u64 = 7 * 86_400;
/// Maximum refresh token lifetime (90 days).
pub(crate) const MAX_REFRESH_TOKEN_TTL_SECS: u64 = 90 * 86_400;
/// Default PBKDF2 iteration count.
pub(crate) const DEFAULT_PASSWORD_ITERATIONS: u32 = 210_000;
/// Minimum PBKDF2 iteration count.
pub(crate) const MIN_PASSWORD_ITERATIONS: u32 = 1_000;
/// Maximum PBKDF2 iteration count.
pub(crate) const MAX_PASSWORD_ITERATIONS: u32 = 10_000_000;
/// Default token issuer.
pub(crate) const DEFAULT_ISSUER: &str = "petmart";
/// Maximum issuer length.
pub(crate) const MAX_ISSUER_LENGTH: usize = 128;
/// Default OTP lifetime.
pub(crate) const DEFAULT_OTP_TTL_SECS: u64 = 300;
/// Minimum OTP lifetime.
pub(crate) const MIN_OTP_TTL_SECS: u64 = 30;
/// Maximum OTP lifetime.
pub(crate) const MAX_OTP_TTL_SECS: u64 = 3_600;
/// Default cooldown between OTP sends.
pub(crate) const DEFAULT_OTP_RESEND_COOLDOWN_SECS: u64 = 60;
/// Default failed attempts before a pending registration is locked.
pub(crate) const DEFAULT_OTP_MAX_ATTEMPTS: u32 = 5;
/// Maximum failed attempts setting.
pub(crate) const MAX_OTP_MAX_ATTEMPTS: u32 = 20;
/// Default OTP digit count.
pub(crate) const DEFAULT_OTP_CODE_LENGTH: u32 = 6;
/// Minimum OTP digit count.
pub(crate) const MIN_OTP_CODE_LENGTH: u32 = 4;
/// Maximum OTP digit count.
pub(crate) const MAX_OTP_CODE_LENGTH: u32 = 10;
/// Default OTP sender address.
pub(crate) const DEFAULT_MAIL_SENDER: &str = "no-reply@petmart.local";
/// Maximum sender address length.
pub(crate) const MAX_MAIL_SENDER_LENGTH: usize = 254;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading config.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Validation error.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Petmart server configuration.
///
/// # Invariants
/// - When loaded via [`PetmartConfig::load`], the config has been validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PetmartConfig {
    /// HTTP listener configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Token and password configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// One-time passcode policy.
    #[serde(default)]
    pub otp: OtpConfig,
    /// Market store backend.
    #[serde(default)]
    pub store: StoreConfig,
    /// OTP delivery configuration.
    #[serde(default)]
    pub mail: MailConfig,
    /// Audit log configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl PetmartConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order is the explicit `path`, then the
    /// [`CONFIG_ENV_VAR`] environment variable, then [`DEFAULT_CONFIG_NAME`]
    /// in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config = Self::from_toml_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration text without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the TOML is malformed or carries
    /// unknown fields.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.auth.validate()?;
        self.otp.validate()?;
        self.store.validate()?;
        self.mail.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `bind` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("invalid server.bind address".to_string()))
    }

    /// Validates listener settings.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Default request body limit.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

// ============================================================================
// SECTION: Auth
// ============================================================================

/// Token and password configuration.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Inline HS256 signing secret.
    #[serde(default)]
    pub jwt_secret: Option<String>,
    /// Name of an environment variable holding the signing secret.
    #[serde(default)]
    pub jwt_secret_env: Option<String>,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: u64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_token_ttl_secs")]
    pub refresh_token_ttl_secs: u64,
    /// PBKDF2-SHA256 iteration count for new password hashes.
    #[serde(default = "default_password_iterations")]
    pub password_iterations: u32,
    /// Token issuer claim.
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("jwt_secret_env", &self.jwt_secret_env)
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_secs", &self.refresh_token_ttl_secs)
            .field("password_iterations", &self.password_iterations)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_secret_env: None,
            access_token_ttl_secs: default_access_token_ttl_secs(),
            refresh_token_ttl_secs: default_refresh_token_ttl_secs(),
            password_iterations: default_password_iterations(),
            issuer: default_issuer(),
        }
    }
}

impl AuthConfig {
    /// Resolves the signing secret from the inline value or the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when neither or both sources are set,
    /// when the named variable is missing, or when the secret is too short.
    pub fn resolve_secret(&self) -> Result<Vec<u8>, ConfigError> {
        let secret = match (&self.jwt_secret, &self.jwt_secret_env) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::Invalid(
                    "auth.jwt_secret and auth.jwt_secret_env are mutually exclusive".to_string(),
                ));
            }
            (None, None) => {
                return Err(ConfigError::Invalid(
                    "auth requires jwt_secret or jwt_secret_env".to_string(),
                ));
            }
            (Some(secret), None) => secret.clone(),
            (None, Some(name)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(ConfigError::Invalid(
                        "auth.jwt_secret_env must be non-empty".to_string(),
                    ));
                }
                env::var(name).map_err(|_| {
                    ConfigError::Invalid(format!("auth.jwt_secret_env variable {name} is not set"))
                })?
            }
        };
        if secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::Invalid(format!(
                "auth jwt secret must be at least {MIN_JWT_SECRET_BYTES} bytes"
            )));
        }
        Ok(secret.into_bytes())
    }

    /// Validates token lifetimes, hashing cost, and the secret source.
    fn validate(&self) -> Result<(), ConfigError> {
        self.resolve_secret()?;
        if !(MIN_ACCESS_TOKEN_TTL_SECS ..= MAX_ACCESS_TOKEN_TTL_SECS)
            .contains(&self.access_token_ttl_secs)
        {
            return Err(ConfigError::Invalid(format!(
                "auth.access_token_ttl_secs must be between {MIN_ACCESS_TOKEN_TTL_SECS} and \
                 {MAX_ACCESS_TOKEN_TTL_SECS}"
            )));
        }
        if self.refresh_token_ttl_secs < self.access_token_ttl_secs {
            return Err(ConfigError::Invalid(
                "auth.refresh_token_ttl_secs must be at least access_token_ttl_secs".to_string(),
            ));
        }
        if self.refresh_token_ttl_secs > MAX_REFRESH_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid(format!(
                "auth.refresh_token_ttl_secs must be at most {MAX_REFRESH_TOKEN_TTL_SECS}"
            )));
        }
        if !(MIN_PASSWORD_ITERATIONS ..= MAX_PASSWORD_ITERATIONS).contains(&self.password_iterations)
        {
            return Err(ConfigError::Invalid(format!(
                "auth.password_iterations must be between {MIN_PASSWORD_ITERATIONS} and \
                 {MAX_PASSWORD_ITERATIONS}"
            )));
        }
        let issuer = self.issuer.trim();
        if issuer.is_empty() || issuer.len() > MAX_ISSUER_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "auth.issuer must be 1..={MAX_ISSUER_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

/// Default access token lifetime.
const fn default_access_token_ttl_secs() -> u64 {
    DEFAULT_ACCESS_TOKEN_TTL_SECS
}

/// Default refresh token lifetime.
const fn default_refresh_token_ttl_secs() -> u64 {
    DEFAULT_REFRESH_TOKEN_TTL_SECS
}

/// Default PBKDF2 iterations.
const fn default_password_iterations() -> u32 {
    DEFAULT_PASSWORD_ITERATIONS
}

/// Default issuer.
fn default_issuer() -> String {
    DEFAULT_ISSUER.to_string()
}

// ============================================================================
// SECTION: OTP
// ============================================================================

/// One-time passcode policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OtpConfig {
    /// Code lifetime in seconds.
    #[serde(default = "default_otp_ttl_secs")]
    pub ttl_secs: u64,
    /// Minimum seconds between sends to the same email.
    #[serde(default = "default_otp_resend_cooldown_secs")]
    pub resend_cooldown_secs: u64,
    /// Failed verifications allowed before the code is locked.
    #[serde(default = "default_otp_max_attempts")]
    pub max_attempts: u32,
    /// Number of digits in a code.
    #[serde(default = "default_otp_code_length")]
    pub code_length: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_otp_ttl_secs(),
            resend_cooldown_secs: default_otp_resend_cooldown_secs(),
            max_attempts: default_otp_max_attempts(),
            code_length: default_otp_code_length(),
        }
    }
}

impl OtpConfig {
    /// Validates OTP ranges.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_OTP_TTL_SECS ..= MAX_OTP_TTL_SECS).contains(&self.ttl_secs) {
            return Err(ConfigError::Invalid(format!(
                "otp.ttl_secs must be between {MIN_OTP_TTL_SECS} and {MAX_OTP_TTL_SECS}"
            )));
        }
        if self.resend_cooldown_secs >= self.ttl_secs {
            return Err(ConfigError::Invalid(
                "otp.resend_cooldown_secs must be less than otp.ttl_secs".to_string(),
            ));
        }
        if !(1 ..= MAX_OTP_MAX_ATTEMPTS).contains(&self.max_attempts) {
            return Err(ConfigError::Invalid(format!(
                "otp.max_attempts must be between 1 and {MAX_OTP_MAX_ATTEMPTS}"
            )));
        }
        if !(MIN_OTP_CODE_LENGTH ..= MAX_OTP_CODE_LENGTH).contains(&self.code_length) {
            return Err(ConfigError::Invalid(format!(
                "otp.code_length must be between {MIN_OTP_CODE_LENGTH} and {MAX_OTP_CODE_LENGTH}"
            )));
        }
        Ok(())
    }
}

/// Default OTP lifetime.
const fn default_otp_ttl_secs() -> u64 {
    DEFAULT_OTP_TTL_SECS
}

/// Default resend cooldown.
const fn default_otp_resend_cooldown_secs() -> u64 {
    DEFAULT_OTP_RESEND_COOLDOWN_SECS
}

/// Default attempt limit.
const fn default_otp_max_attempts() -> u32 {
    DEFAULT_OTP_MAX_ATTEMPTS
}

/// Default code length.
const fn default_otp_code_length() -> u32 {
    DEFAULT_OTP_CODE_LENGTH
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Market store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// In-memory `SQLite` database; data is lost on exit.
    #[default]
    Memory,
    /// File-backed `SQLite` database.
    Sqlite,
}

/// Market store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// Database path for the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::Memory,
            path: None,
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Returns the `SQLite` settings for a file-backed store.
    ///
    /// Returns `None` for the memory backend.
    #[must_use]
    pub fn sqlite_config(&self) -> Option<SqliteStoreConfig> {
        match (self.store_type, &self.path) {
            (StoreType::Sqlite, Some(path)) => Some(SqliteStoreConfig {
                path: path.clone(),
                busy_timeout_ms: self.busy_timeout_ms,
                journal_mode: self.journal_mode,
                sync_mode: self.sync_mode,
            }),
            _ => None,
        }
    }

    /// Validates backend-specific requirements.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            StoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid(
                        "memory store must not set path".to_string(),
                    ));
                }
            }
            StoreType::Sqlite => {
                let Some(path) = &self.path else {
                    return Err(ConfigError::Invalid("sqlite store requires path".to_string()));
                };
                validate_path_string("store.path", &path.to_string_lossy())?;
            }
        }
        Ok(())
    }
}

/// Default busy timeout for `SQLite` stores.
const fn default_store_busy_timeout_ms() -> u64 {
    petmart_store_sqlite::store::default_busy_timeout_ms()
}

// ============================================================================
// SECTION: Mail
// ============================================================================

/// OTP delivery backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MailDelivery {
    /// Record deliveries in the audit log without the code.
    #[default]
    Log,
    /// Append deliveries, including the code, to an outbox file.
    File,
}

/// OTP delivery configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    /// Delivery backend.
    #[serde(default)]
    pub delivery: MailDelivery,
    /// Outbox file for the file backend.
    #[serde(default)]
    pub outbox_path: Option<PathBuf>,
    /// Sender address stamped on messages.
    #[serde(default = "default_mail_sender")]
    pub sender: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            delivery: MailDelivery::Log,
            outbox_path: None,
            sender: default_mail_sender(),
        }
    }
}

impl MailConfig {
    /// Validates delivery settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.delivery {
            MailDelivery::Log => {
                if self.outbox_path.is_some() {
                    return Err(ConfigError::Invalid(
                        "log mail delivery must not set outbox_path".to_string(),
                    ));
                }
            }
            MailDelivery::File => {
                let Some(path) = &self.outbox_path else {
                    return Err(ConfigError::Invalid(
                        "file mail delivery requires outbox_path".to_string(),
                    ));
                };
                validate_path_string("mail.outbox_path", &path.to_string_lossy())?;
            }
        }
        let sender = self.sender.trim();
        if sender.len() > MAX_MAIL_SENDER_LENGTH || !sender.contains('@') {
            return Err(ConfigError::Invalid(
                "mail.sender must be an email address".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default sender address.
fn default_mail_sender() -> String {
    DEFAULT_MAIL_SENDER.to_string()
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit log configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Enables audit events.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Append-only JSON lines file; stderr when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

impl AuditConfig {
    /// Validates the audit path.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Audit logging is on unless disabled.
const fn default_audit_enabled() -> bool {
    true
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
