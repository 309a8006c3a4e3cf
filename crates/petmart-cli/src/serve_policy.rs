// crates/petmart-cli/src/serve_policy.rs
// ============================================================================
// Module: Serve Policy
// Description: Network exposure policy checks for the CLI server launcher.
// Purpose: Enforce safe-by-default bind behavior with explicit opt-in.
// Dependencies: petmart-config, std
// ============================================================================

//! ## Overview
//! Binding the HTTP API to a non-loopback address is refused unless the
//! operator opts in with `--allow-non-loopback` or
//! [`ALLOW_NON_LOOPBACK_ENV`]. The API carries bearer tokens in clear text,
//! so exposed deployments are expected to sit behind a TLS terminator.

use std::env;
use std::net::SocketAddr;

use petmart_config::PetmartConfig;
use thiserror::Error;

/// Environment variable enabling non-loopback server binds.
pub const ALLOW_NON_LOOPBACK_ENV: &str = "PETMART_ALLOW_NON_LOOPBACK";

/// Bind outcome metadata for startup warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindOutcome {
    /// Parsed bind address.
    pub bind_addr: SocketAddr,
    /// True when the server is bound to a non-loopback address.
    pub network_exposed: bool,
    /// Whether audit logging is enabled.
    pub audit_enabled: bool,
}

/// Serve policy failures for bind safety.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServePolicyError {
    /// Environment variable was set to an invalid value.
    #[error("{ALLOW_NON_LOOPBACK_ENV} must be a boolean, got '{value}'")]
    InvalidEnv {
        /// Raw environment value.
        value: String,
    },
    /// Bind string failed to parse.
    #[error("invalid bind address '{bind}': {error}")]
    InvalidBind {
        /// Raw bind value.
        bind: String,
        /// Parse error message.
        error: String,
    },
    /// Non-loopback binding requires explicit opt-in.
    #[error(
        "refusing to bind {bind}: pass --allow-non-loopback or set {ALLOW_NON_LOOPBACK_ENV}=true"
    )]
    NonLoopbackOptInRequired {
        /// Bind address.
        bind: String,
    },
}

/// Resolves the non-loopback opt-in flag from CLI and environment.
///
/// # Errors
/// Returns [`ServePolicyError::InvalidEnv`] when the environment value is invalid.
pub fn resolve_allow_non_loopback(flag: bool) -> Result<bool, ServePolicyError> {
    if flag {
        return Ok(true);
    }
    let Some(value) = env::var_os(ALLOW_NON_LOOPBACK_ENV) else {
        return Ok(false);
    };
    let value = value.to_string_lossy().to_string();
    parse_allow_non_loopback_value(&value)
}

/// Enforces the local-only default for the HTTP listener.
///
/// # Errors
/// Returns [`ServePolicyError`] when the bind is malformed or exposed
/// without opt-in.
pub fn enforce_local_only(
    config: &PetmartConfig,
    allow_non_loopback: bool,
) -> Result<BindOutcome, ServePolicyError> {
    let bind = config.server.bind.trim();
    let addr: SocketAddr =
        bind.parse().map_err(|err: std::net::AddrParseError| ServePolicyError::InvalidBind {
            bind: bind.to_string(),
            error: err.to_string(),
        })?;
    let network_exposed = !addr.ip().is_loopback();
    if network_exposed && !allow_non_loopback {
        return Err(ServePolicyError::NonLoopbackOptInRequired {
            bind: bind.to_string(),
        });
    }
    Ok(BindOutcome {
        bind_addr: addr,
        network_exposed,
        audit_enabled: config.audit.enabled,
    })
}

/// Parses a bool-ish string (true/false/1/0/yes/no/on/off).
fn parse_boolish(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

/// Parses an env value for allow-non-loopback.
pub(crate) fn parse_allow_non_loopback_value(value: &str) -> Result<bool, ServePolicyError> {
    parse_boolish(value).ok_or_else(|| ServePolicyError::InvalidEnv {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::expect_used,
        reason = "Test helpers use expect/expect_err for concise failure messages."
    )]

    use petmart_config::PetmartConfig;

    use super::ServePolicyError;
    use super::enforce_local_only;
    use super::parse_allow_non_loopback_value;

    fn config_with_bind(bind: &str) -> PetmartConfig {
        let mut config = PetmartConfig::default();
        config.server.bind = bind.to_string();
        config
    }

    #[test]
    fn loopback_is_allowed_without_opt_in() {
        let outcome =
            enforce_local_only(&config_with_bind("127.0.0.1:8080"), false).expect("loopback");
        assert!(!outcome.network_exposed);
        let outcome = enforce_local_only(&config_with_bind("[::1]:8080"), false).expect("ipv6");
        assert!(!outcome.network_exposed);
    }

    #[test]
    fn non_loopback_requires_opt_in() {
        let err = enforce_local_only(&config_with_bind("0.0.0.0:8080"), false)
            .expect_err("expected opt-in error");
        assert!(matches!(err, ServePolicyError::NonLoopbackOptInRequired { .. }));
    }

    #[test]
    fn non_loopback_with_opt_in_is_exposed() {
        let outcome =
            enforce_local_only(&config_with_bind("0.0.0.0:8080"), true).expect("opted in");
        assert!(outcome.network_exposed);
    }

    #[test]
    fn malformed_bind_is_rejected() {
        let err = enforce_local_only(&config_with_bind("localhost"), true)
            .expect_err("expected bind error");
        assert!(matches!(err, ServePolicyError::InvalidBind { .. }));
    }

    #[test]
    fn parse_allow_non_loopback_accepts_true() {
        let result = parse_allow_non_loopback_value(" Yes ").expect("parse env");
        assert!(result);
    }

    #[test]
    fn parse_allow_non_loopback_rejects_invalid() {
        let err = parse_allow_non_loopback_value("maybe").expect_err("expected invalid env");
        assert!(matches!(err, ServePolicyError::InvalidEnv { .. }));
    }
}
