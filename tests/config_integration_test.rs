//! Integration tests for configuration loading and validation
//!
//! Tests that touch environment variables hold `ENV_MUTEX` so they do not
//! interfere with each other.

use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tenant_backup::config::{load_config, Environment};

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("BACKUP_APPLICATION_LOG_LEVEL");
    std::env::remove_var("BACKUP_EXPORT_TIMEZONE_OFFSET");
    std::env::remove_var("BACKUP_POSTGRESQL_CONNECTION_STRING");
    std::env::remove_var("BACKUP_POSTGRESQL_MAX_CONNECTIONS");
    std::env::remove_var("TEST_PG_PASSWORD");
    std::env::remove_var("TEST_ACME_TOKEN");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"
environment = "production"

[server]
bind_address = "0.0.0.0:9090"
shutdown_timeout_secs = 10

[postgresql]
connection_string = "postgresql://reader:pw@db:5432/erp"
max_connections = 20
connection_timeout_seconds = 5
statement_timeout_seconds = 30

[export]
timezone_offset = "-04:00"
currency_format = '"US$" #,##0.00'
date_format = "yyyy-mm-dd"
datetime_format = "yyyy-mm-dd hh:mm"
collect_timeout_seconds = 45

[[auth.api_keys]]
token = "acme-production-token"
tenant_id = "acme"

[[auth.api_keys]]
token = "globex-production-token"
tenant_id = "globex"

[logging]
local_enabled = false
local_path = "/tmp/tenant-backup"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.application.environment, Environment::Production);
    assert_eq!(config.server.bind_address, "0.0.0.0:9090");
    assert_eq!(config.server.shutdown_timeout_secs, 10);

    let pg = config.postgresql.as_ref().expect("postgresql section");
    assert_eq!(pg.max_connections, 20);
    assert_eq!(pg.statement_timeout_seconds, 30);

    assert_eq!(
        config.export.offset().unwrap().local_minus_utc(),
        -4 * 3600
    );
    assert_eq!(config.export.currency_format, "\"US$\" #,##0.00");
    assert_eq!(config.export.collect_timeout_seconds, 45);

    assert_eq!(config.auth.api_keys.len(), 2);
    assert_eq!(config.auth.api_keys[1].tenant_id, "globex");
    assert!(!config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("[logging]\nlocal_enabled = false\n");
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.application.environment, Environment::Development);
    assert_eq!(config.server.bind_address, "127.0.0.1:8080");
    assert!(config.postgresql.is_none());
    assert!(config.require_postgresql().is_err());
    assert_eq!(config.export.timezone_offset, "-03:00");
    assert_eq!(config.export.currency_format, "\"R$\" #,##0.00");
    assert_eq!(config.export.date_format, "dd/mm/yyyy");
    assert_eq!(config.export.collect_timeout_seconds, 120);
    assert!(config.auth.api_keys.is_empty());
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_PG_PASSWORD", "secret_pass");
    std::env::set_var("TEST_ACME_TOKEN", "secret_token");

    let temp_file = write_config(
        r#"
[postgresql]
connection_string = "postgresql://reader:${TEST_PG_PASSWORD}@db:5432/erp"

[[auth.api_keys]]
token = "${TEST_ACME_TOKEN}"
tenant_id = "acme"

[logging]
local_enabled = false
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    let pg = config.postgresql.as_ref().unwrap();
    assert!(pg.connection_string.expose_secret().matches("postgresql://reader:secret_pass@db:5432/erp"));
    assert!(config.auth.api_keys[0].token.expose_secret().matches("secret_token"));

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable_is_an_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[postgresql]
connection_string = "postgresql://reader:${TEST_PG_PASSWORD}@db:5432/erp"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_PG_PASSWORD"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("BACKUP_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("BACKUP_EXPORT_TIMEZONE_OFFSET", "+01:00");
    std::env::set_var(
        "BACKUP_POSTGRESQL_CONNECTION_STRING",
        "postgresql://reader:pw@override:5432/erp",
    );

    let temp_file = write_config(
        r#"
[application]
log_level = "info"

[export]
timezone_offset = "-03:00"

[logging]
local_enabled = false
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.export.offset().unwrap().local_minus_utc(), 3600);
    let pg = config.postgresql.as_ref().expect("section created by override");
    assert!(pg
        .connection_string
        .expose_secret()
        .starts_with("postgresql://reader:pw@override"));

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    for contents in [
        "[application]\nlog_level = \"loud\"\n",
        "[export]\ntimezone_offset = \"America/Sao_Paulo\"\n",
        "[server]\nbind_address = \"not-an-address\"\n",
        "[[auth.api_keys]]\ntoken = \"same\"\ntenant_id = \"a\"\n[[auth.api_keys]]\ntoken = \"same\"\ntenant_id = \"b\"\n",
        "[application]\nenvironment = \"production\"\n[[auth.api_keys]]\ntoken = \"short\"\ntenant_id = \"a\"\n",
    ] {
        let temp_file = write_config(contents);
        assert!(load_config(temp_file.path()).is_err(), "accepted:\n{contents}");
    }
}
