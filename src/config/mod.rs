//! Configuration management for the export engine.
//!
//! TOML configuration with `${VAR_NAME}` substitution, `BACKUP_*` environment
//! overrides, defaults for every optional setting, and validation on load.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tenant_backup::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tenant-backup.toml")?;
//! println!("Operating offset: {}", config.export.timezone_offset);
//! println!("Listening on: {}", config.server.bind_address);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level and runtime environment
//! - [`ServerConfig`] - HTTP bind address and shutdown grace period
//! - [`PostgreSQLConfig`] - relational store connection pool
//! - [`ExportConfig`] - operating timezone, number formats, collection timeout
//! - [`AuthConfig`] - API keys resolving callers to tenants
//! - [`LoggingConfig`] - local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [server]
//! bind_address = "0.0.0.0:8080"
//!
//! [postgresql]
//! connection_string = "${BACKUP_DATABASE_URL}"
//!
//! [export]
//! timezone_offset = "-03:00"
//!
//! [[auth.api_keys]]
//! token = "${BACKUP_TENANT_ACME_TOKEN}"
//! tenant_id = "acme"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_str};
pub use schema::{
    ApiKeyConfig, ApplicationConfig, AuthConfig, BackupConfig, Environment, ExportConfig,
    LoggingConfig, PostgreSQLConfig, ServerConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
