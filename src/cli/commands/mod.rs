//! CLI command implementations
//!
//! Shared helpers for the export commands live here: building the
//! orchestrator from configuration and writing artifacts atomically.

pub mod backup;
pub mod init;
pub mod movement;
pub mod serve;
pub mod validate;

use crate::adapters::database::create_repositories;
use crate::config::BackupConfig;
use crate::core::export::{ExportOrchestrator, WorkbookArtifact};
use crate::domain::{EngineError, Result, StageError};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Orchestrator over the configured PostgreSQL store
pub(crate) async fn build_orchestrator(config: &BackupConfig) -> Result<ExportOrchestrator> {
    let postgresql = config
        .require_postgresql()
        .map_err(EngineError::Configuration)?;
    let repositories = create_repositories(postgresql).await?;
    ExportOrchestrator::from_config(repositories, &config.export)
}

/// Writes the artifact into `dir` under its own filename
///
/// Bytes go to a hidden temporary sibling first and are renamed into place,
/// so the final path never holds a truncated file.
///
/// # Errors
///
/// Returns the I/O error of the failed step; the temporary file is removed.
pub async fn write_artifact(dir: &Path, artifact: &WorkbookArtifact) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let target = dir.join(&artifact.filename);
    let partial = dir.join(format!(
        ".{}.{}.partial",
        artifact.filename,
        Uuid::new_v4().simple()
    ));

    let written = async {
        tokio::fs::write(&partial, &artifact.bytes).await?;
        tokio::fs::rename(&partial, &target).await
    }
    .await;

    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e);
    }

    Ok(target)
}

/// Prints the outcome of a written export
pub(crate) fn print_artifact(path: &Path, artifact: &WorkbookArtifact) {
    let summary = &artifact.summary;
    println!("✅ Export written: {}", path.display());
    println!();
    println!("📊 Export Summary:");
    println!("  Tenant: {}", summary.tenant_id);
    for sheet in &summary.sheets {
        println!("  {}: {} rows", sheet.name, sheet.rows);
    }
    println!("  Size: {} bytes", summary.bytes);
    println!("  SHA-256: {}", summary.checksum);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();
}

/// Prints a failed export and returns its exit code
pub(crate) fn report_failure(failure: &StageError) -> i32 {
    eprintln!("❌ Export failed during the {} stage", failure.stage);
    eprintln!("   Error: {}", failure.error);
    failure.kind().exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::export::summary::{calculate_checksum, ExportKind, ExportSummary};
    use crate::domain::TenantId;
    use std::time::Duration;

    fn artifact(bytes: &[u8]) -> WorkbookArtifact {
        WorkbookArtifact {
            filename: "movimentacao_2024-03-10.xlsx".to_string(),
            content_type: "application/octet-stream",
            bytes: bytes.to_vec(),
            summary: ExportSummary {
                export_id: Uuid::nil(),
                kind: ExportKind::DailyMovement,
                tenant_id: TenantId::new("acme").unwrap(),
                filename: "movimentacao_2024-03-10.xlsx".to_string(),
                sheets: vec![],
                bytes: bytes.len(),
                checksum: calculate_checksum(bytes),
                duration: Duration::from_millis(1),
            },
        }
    }

    #[tokio::test]
    async fn test_write_artifact_leaves_only_final_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports");

        let path = write_artifact(&out, &artifact(b"PK\x03\x04")).await.unwrap();

        assert_eq!(path, out.join("movimentacao_2024-03-10.xlsx"));
        assert_eq!(std::fs::read(&path).unwrap(), b"PK\x03\x04");
        let entries: Vec<_> = std::fs::read_dir(&out).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_write_artifact_replaces_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), &artifact(b"old")).await.unwrap();
        let path = write_artifact(dir.path(), &artifact(b"new")).await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"new");
    }
}
