//! Logging and observability
//!
//! Structured logging through `tracing`: a human-readable console layer and an
//! optional JSON file layer with rotation. Export-specific macros keep the
//! field names of export events consistent across the CLI and HTTP paths.
//!
//! # Example
//!
//! ```no_run
//! use tenant_backup::logging::init_logging;
//! use tenant_backup::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export operation
///
/// # Example
///
/// ```no_run
/// use tenant_backup::log_export_start;
/// use tenant_backup::domain::TenantId;
///
/// let tenant = TenantId::new("acme").unwrap();
/// log_export_start!("full_backup", &tenant);
/// ```
#[macro_export]
macro_rules! log_export_start {
    ($kind:expr, $tenant_id:expr) => {
        tracing::info!(
            export_kind = %$kind,
            tenant_id = %$tenant_id,
            "Starting export"
        );
    };
}

/// Log the completion of an export operation
#[macro_export]
macro_rules! log_export_complete {
    ($filename:expr, $rows:expr, $bytes:expr, $duration:expr) => {
        tracing::info!(
            filename = %$filename,
            rows = $rows,
            bytes = $bytes,
            duration_ms = $duration.as_millis() as u64,
            "Export completed"
        );
    };
}

/// Log a failed export stage
///
/// Internal and data access failures are logged at error level, caller
/// mistakes (authorization, validation) at warn.
///
/// # Example
///
/// ```no_run
/// use tenant_backup::log_stage_failure;
/// use tenant_backup::domain::{EngineError, ExportStage, StageError};
///
/// let failure = StageError::new(ExportStage::Window, EngineError::validation("date", "bad"));
/// log_stage_failure!(&failure);
/// ```
#[macro_export]
macro_rules! log_stage_failure {
    ($failure:expr) => {
        match $failure.kind() {
            $crate::domain::ErrorKind::Authorization | $crate::domain::ErrorKind::Validation => {
                tracing::warn!(
                    stage = %$failure.stage,
                    error = %$failure.error,
                    "Export rejected"
                );
            }
            _ => {
                tracing::error!(
                    stage = %$failure.stage,
                    error = %$failure.error,
                    "Export failed"
                );
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::{EngineError, ExportStage, StageError, TenantId};
    use std::time::Duration;

    #[test]
    fn test_macros_expand_without_subscriber() {
        let tenant = TenantId::new("acme").unwrap();
        log_export_start!("daily_movement", &tenant);
        log_export_complete!("movimentacao_2024-03-10.xlsx", 3usize, 2048usize, Duration::from_millis(12));

        let rejected = StageError::new(ExportStage::Window, EngineError::validation("date", "bad"));
        log_stage_failure!(&rejected);
        let failed = StageError::new(ExportStage::Collect, EngineError::data_access("clients", "down"));
        log_stage_failure!(&failed);
    }
}
