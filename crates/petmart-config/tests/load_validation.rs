//! Config loading and validation tests for petmart-config.
// crates/petmart-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Load petmart.toml files and validate section constraints.
// Purpose: Ensure configuration fails closed on bad input.
// =============================================================================

#![allow(clippy::use_debug, reason = "Debug formatting quotes TOML strings and reports errors.")]

use std::fs;
use std::path::PathBuf;

use petmart_config::ConfigError;
use petmart_config::MailDelivery;
use petmart_config::PetmartConfig;
use petmart_config::StoreType;

type TestResult = Result<(), String>;

/// Inline secret long enough to pass validation.
const SECRET_TOML: &str = "[auth]\njwt_secret = \"0123456789abcdef0123456789abcdef\"\n";

fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}

fn minimal_config() -> Result<PetmartConfig, String> {
    PetmartConfig::from_toml_str(SECRET_TOML).map_err(|err| err.to_string())
}

#[test]
fn load_reads_full_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("petmart.toml");
    let db_path = dir.path().join("market.db");
    let outbox = dir.path().join("outbox.jsonl");
    let content = format!(
        "{SECRET_TOML}access_token_ttl_secs = 600\n\n[server]\nbind = \"127.0.0.1:9090\"\n\n\
         [store]\ntype = \"sqlite\"\npath = {db:?}\njournal_mode = \"delete\"\n\n\
         [mail]\ndelivery = \"file\"\noutbox_path = {outbox:?}\n\n[otp]\ncode_length = 8\n",
        db = db_path.to_string_lossy(),
        outbox = outbox.to_string_lossy(),
    );
    fs::write(&path, content).map_err(|err| err.to_string())?;
    let config = PetmartConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.auth.access_token_ttl_secs != 600 {
        return Err("access ttl not applied".to_string());
    }
    if config.store.store_type != StoreType::Sqlite || config.store.path != Some(db_path) {
        return Err("store section not applied".to_string());
    }
    if config.mail.delivery != MailDelivery::File {
        return Err("mail section not applied".to_string());
    }
    if config.otp.code_length != 8 || config.otp.ttl_secs != 300 {
        return Err("otp defaults not merged".to_string());
    }
    Ok(())
}

#[test]
fn load_rejects_missing_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    match PetmartConfig::load(Some(&dir.path().join("absent.toml"))) {
        Err(ConfigError::Io(_)) => Ok(()),
        other => Err(format!("expected io error, got {:?}", other.map(|_| ()))),
    }
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("big.toml");
    let mut content = SECRET_TOML.to_string();
    content.push_str(&"#".repeat(1024 * 1024));
    fs::write(&path, content).map_err(|err| err.to_string())?;
    assert_invalid(PetmartConfig::load(Some(&path)).map(|_| ()), "exceeds size limit")
}

#[test]
fn load_rejects_non_utf8() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("bad.toml");
    fs::write(&path, [0xff_u8, 0xfe, 0x00]).map_err(|err| err.to_string())?;
    assert_invalid(PetmartConfig::load(Some(&path)).map(|_| ()), "must be utf-8")
}

#[test]
fn load_rejects_long_path_component() -> TestResult {
    let path = PathBuf::from("a".repeat(300));
    assert_invalid(PetmartConfig::load(Some(&path)).map(|_| ()), "component too long")
}

#[test]
fn unknown_fields_are_parse_errors() -> TestResult {
    match PetmartConfig::from_toml_str("[server]\nport = 80\n") {
        Err(ConfigError::Parse(_)) => Ok(()),
        other => Err(format!("expected parse error, got {:?}", other.map(|_| ()))),
    }
}

#[test]
fn both_secret_sources_are_rejected() -> TestResult {
    let mut config = minimal_config()?;
    config.auth.jwt_secret_env = Some("PETMART_JWT".to_string());
    assert_invalid(config.validate(), "mutually exclusive")
}

#[test]
fn missing_secret_env_var_is_rejected() -> TestResult {
    let mut config = minimal_config()?;
    config.auth.jwt_secret = None;
    config.auth.jwt_secret_env = Some("PETMART_TEST_SECRET_THAT_IS_NEVER_SET".to_string());
    assert_invalid(config.validate(), "is not set")
}

#[test]
fn invalid_bind_is_rejected() -> TestResult {
    let mut config = minimal_config()?;
    config.server.bind = "localhost".to_string();
    assert_invalid(config.validate(), "invalid server.bind address")
}

#[test]
fn zero_body_limit_is_rejected() -> TestResult {
    let mut config = minimal_config()?;
    config.server.max_body_bytes = 0;
    assert_invalid(config.validate(), "server.max_body_bytes must be greater than zero")
}

#[test]
fn access_ttl_range_is_enforced() -> TestResult {
    let mut config = minimal_config()?;
    config.auth.access_token_ttl_secs = 10;
    assert_invalid(config.validate(), "auth.access_token_ttl_secs")
}

#[test]
fn refresh_ttl_must_cover_access_ttl() -> TestResult {
    let mut config = minimal_config()?;
    config.auth.access_token_ttl_secs = 3_600;
    config.auth.refresh_token_ttl_secs = 1_800;
    assert_invalid(config.validate(), "at least access_token_ttl_secs")
}

#[test]
fn refresh_ttl_upper_bound_is_enforced() -> TestResult {
    let mut config = minimal_config()?;
    config.auth.refresh_token_ttl_secs = 91 * 86_400;
    assert_invalid(config.validate(), "auth.refresh_token_ttl_secs must be at most")
}

#[test]
fn password_iterations_range_is_enforced() -> TestResult {
    let mut config = minimal_config()?;
    config.auth.password_iterations = 10;
    assert_invalid(config.validate(), "auth.password_iterations")
}

#[test]
fn otp_cooldown_must_be_below_ttl() -> TestResult {
    let mut config = minimal_config()?;
    config.otp.ttl_secs = 60;
    config.otp.resend_cooldown_secs = 60;
    assert_invalid(config.validate(), "otp.resend_cooldown_secs")
}

#[test]
fn otp_attempts_and_length_ranges_are_enforced() -> TestResult {
    let mut config = minimal_config()?;
    config.otp.max_attempts = 0;
    assert_invalid(config.validate(), "otp.max_attempts")?;
    let mut config = minimal_config()?;
    config.otp.code_length = 12;
    assert_invalid(config.validate(), "otp.code_length")
}

#[test]
fn memory_store_rejects_path() -> TestResult {
    let mut config = minimal_config()?;
    config.store.store_type = StoreType::Memory;
    config.store.path = Some(PathBuf::from("market.db"));
    assert_invalid(config.validate(), "memory store must not set path")
}

#[test]
fn sqlite_store_requires_path() -> TestResult {
    let mut config = minimal_config()?;
    config.store.store_type = StoreType::Sqlite;
    config.store.path = None;
    assert_invalid(config.validate(), "sqlite store requires path")
}

#[test]
fn file_mail_requires_outbox() -> TestResult {
    let mut config = minimal_config()?;
    config.mail.delivery = MailDelivery::File;
    assert_invalid(config.validate(), "file mail delivery requires outbox_path")
}

#[test]
fn mail_sender_must_be_address() -> TestResult {
    let mut config = minimal_config()?;
    config.mail.sender = "petmart".to_string();
    assert_invalid(config.validate(), "mail.sender must be an email address")
}

#[test]
fn audit_path_must_be_non_empty() -> TestResult {
    let mut config = minimal_config()?;
    config.audit.path = Some(PathBuf::from("  "));
    assert_invalid(config.validate(), "audit.path must be non-empty")
}
