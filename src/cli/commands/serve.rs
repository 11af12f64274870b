//! Serve command implementation
//!
//! Runs the HTTP transport until a shutdown signal arrives.

use super::build_orchestrator;
use crate::adapters::identity::ApiKeyIdentityProvider;
use crate::config::load_config;
use crate::server::{self, AppState};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override `server.bind_address`
    #[arg(short, long)]
    pub bind: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(e.kind().exit_code());
            }
        };

        let identity = match ApiKeyIdentityProvider::from_config(&config.auth) {
            Ok(provider) => provider,
            Err(e) => {
                eprintln!("Invalid [auth] section: {e}");
                return Ok(e.kind().exit_code());
            }
        };
        tracing::info!(api_keys = identity.len(), "Identity provider ready");

        let orchestrator = match build_orchestrator(&config).await {
            Ok(o) => o,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize exports");
                eprintln!("Failed to initialize exports: {e}");
                return Ok(e.kind().exit_code());
            }
        };

        let address = self.bind.as_deref().unwrap_or(&config.server.bind_address);
        let drain = Duration::from_secs(config.server.shutdown_timeout_secs);
        let state = AppState::new(orchestrator, Arc::new(identity));

        match server::serve(address, drain, state, shutdown_signal).await {
            Ok(()) => Ok(0),
            Err(e) => {
                tracing::error!(error = %e, "HTTP server failed");
                eprintln!("HTTP server failed: {e}");
                Ok(e.kind().exit_code())
            }
        }
    }
}
