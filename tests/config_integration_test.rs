//! Integration tests for configuration loading and validation
//!
//! Note: Tests that modify environment variables should be run with
//! --test-threads=1 to avoid interference between tests.

use oasis_sync::config::load_config;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("OASIS_APPLICATION_LOG_LEVEL");
    std::env::remove_var("OASIS_PORTAL_BASE_URL");
    std::env::remove_var("OASIS_PORTAL_PASSWORD");
    std::env::remove_var("OASIS_SYNC_LOOKBACK_DAYS");
    std::env::remove_var("TEST_PORTAL_PASSWORD");
}

fn write_temp(toml: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(toml.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[application]
log_level = "debug"
dry_run = true
imported_by = "night-batch"

environment = "staging"

[portal]
base_url = "https://oasis.example.sa/portal"
username = "provider-user"
password = "portal-pass"
accept_invalid_certs = true
headless = true
navigation_timeout_secs = 45
settle_timeout_secs = 20
action_timeout_secs = 12
diagnostics_dir = "diag"

[sync]
enabled = true
sync_interval_minutes = 120
sync_rejections = true
sync_pending = true
sync_approved = false
lookback_days = 45
notify_on_new_rejections = true
notification_email = "rcm@example.sa"

[store]
backend = "jsonl"
path = "data/test.jsonl"

[logging]
local_enabled = false
local_path = "/tmp/oasis"
local_rotation = "hourly"
"#;

    let temp_file = write_temp(toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.application.imported_by, "night-batch");

    assert_eq!(config.portal.base_url, "https://oasis.example.sa/portal");
    assert_eq!(config.portal.username, "provider-user");
    assert_eq!(config.portal.password.expose_secret(), "portal-pass");
    assert_eq!(config.portal.navigation_timeout_secs, 45);
    assert_eq!(config.portal.diagnostics_dir, "diag");

    assert_eq!(config.sync.sync_interval_minutes, 120);
    assert!(config.sync.sync_pending);
    assert_eq!(config.sync.lookback_days, 45);
    assert_eq!(
        config.sync.notification_email.as_deref(),
        Some("rcm@example.sa")
    );

    assert_eq!(config.store.path, "data/test.jsonl");
    assert!(!config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_minimal_config_gets_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[application]
log_level = "info"

[portal]
base_url = "https://oasis.example.sa/portal"
username = "provider-user"
password = "pw"

[sync]
"#;

    let temp_file = write_temp(toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.portal.navigation_timeout_secs, 30);
    assert_eq!(config.sync.lookback_days, 30);
    assert!(config.sync.sync_rejections);
    assert!(!config.sync.sync_pending);
    assert_eq!(config.store.path, "data/rejections.jsonl");
    assert!(config.logging.local_enabled);
}

#[test]
fn test_env_substitution_in_password() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_PORTAL_PASSWORD", "from-env");

    let toml_content = r#"
[application]
log_level = "info"

[portal]
base_url = "https://oasis.example.sa/portal"
username = "provider-user"
password = "${TEST_PORTAL_PASSWORD}"

[sync]
"#;

    let temp_file = write_temp(toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");
    assert_eq!(config.portal.password.expose_secret(), "from-env");

    cleanup_env_vars();
}

#[test]
fn test_env_overrides_take_precedence() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("OASIS_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("OASIS_SYNC_LOOKBACK_DAYS", "7");

    let toml_content = r#"
[application]
log_level = "info"

[portal]
base_url = "https://oasis.example.sa/portal"
username = "provider-user"
password = "pw"

[sync]
lookback_days = 60
"#;

    let temp_file = write_temp(toml_content);
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.sync.lookback_days, 7);

    cleanup_env_vars();
}

#[test]
fn test_invalid_values_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    // Inverted bounds must fail validation at load time
    let toml_content = r#"
[application]
log_level = "info"

[portal]
base_url = "https://oasis.example.sa/portal"
username = "provider-user"
password = "pw"
navigation_timeout_secs = 0

[sync]
"#;

    let temp_file = write_temp(toml_content);
    assert!(load_config(temp_file.path()).is_err());
}

#[test]
fn test_missing_file_errors() {
    let result = load_config("definitely/not/here.toml");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not found"));
}

#[test]
fn test_notify_without_email_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let toml_content = r#"
[application]
log_level = "info"

[portal]
base_url = "https://oasis.example.sa/portal"
username = "provider-user"
password = "pw"

[sync]
notify_on_new_rejections = true
"#;

    let temp_file = write_temp(toml_content);
    assert!(load_config(temp_file.path()).is_err());
}
