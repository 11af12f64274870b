//! Backup command implementation
//!
//! Writes a full backup workbook of one tenant to disk.

use super::{build_orchestrator, print_artifact, report_failure, write_artifact};
use crate::config::load_config;
use crate::domain::TenantId;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the backup command
#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Tenant whose data is exported
    #[arg(short, long)]
    pub tenant: String,

    /// Directory the workbook is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl BackupArgs {
    /// Execute the backup command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(tenant = %self.tenant, "Starting backup command");

        let tenant = match TenantId::new(self.tenant.as_str()) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Invalid tenant: {e}");
                return Ok(2);
            }
        };

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(e.kind().exit_code());
            }
        };

        let orchestrator = match build_orchestrator(&config).await {
            Ok(o) => o,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize export");
                eprintln!("Failed to initialize export: {e}");
                return Ok(e.kind().exit_code());
            }
        };

        println!("🚀 Starting full backup of tenant {tenant}...");
        let artifact = match orchestrator.full_backup(&tenant).await {
            Ok(a) => a,
            Err(failure) => return Ok(report_failure(&failure)),
        };

        let path = write_artifact(&self.output_dir, &artifact).await?;
        print_artifact(&path, &artifact);
        Ok(0)
    }
}
