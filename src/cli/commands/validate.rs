//! Validate config command implementation
//!
//! This module implements the `validate-config` command.

use crate::adapters::postgresql::client::redact_connection_string;
use crate::config::load_config;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading runs validation as its last step
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.application.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Bind Address: {}", config.server.bind_address);
        match &config.postgresql {
            Some(pg) => {
                println!(
                    "  PostgreSQL: {}",
                    redact_connection_string(pg.connection_string.expose_secret().as_ref())
                );
                println!("  Max Connections: {}", pg.max_connections);
            }
            None => println!("  PostgreSQL: not configured (required by serve, backup, movement)"),
        }
        println!("  Timezone Offset: {}", config.export.timezone_offset);
        println!("  Currency Format: {}", config.export.currency_format);
        println!("  API Keys: {}", config.auth.api_keys.len());
        println!();
        Ok(0)
    }
}
