//! Export summary and reporting
//!
//! Every successful export produces an [`ExportSummary`] that is logged on
//! completion and returned to the CLI for display.

use crate::core::projection::SheetData;
use crate::domain::ids::TenantId;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Which export produced an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    /// Every record of the tenant
    FullBackup,
    /// Records of one calendar day
    DailyMovement,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::FullBackup => "full_backup",
            ExportKind::DailyMovement => "daily_movement",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name and data row count of one sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
    pub name: String,
    pub rows: usize,
}

impl From<&SheetData> for SheetSummary {
    fn from(sheet: &SheetData) -> Self {
        Self {
            name: sheet.name.clone(),
            rows: sheet.row_count(),
        }
    }
}

/// Summary of a completed export
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// Correlation id, also attached to the export's tracing span
    pub export_id: Uuid,
    pub kind: ExportKind,
    pub tenant_id: TenantId,
    pub filename: String,
    pub sheets: Vec<SheetSummary>,
    /// Artifact size in bytes
    pub bytes: usize,
    /// Hex-encoded SHA-256 of the artifact
    pub checksum: String,
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl ExportSummary {
    /// Data rows across every sheet
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|sheet| sheet.rows).sum()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        crate::log_export_complete!(self.filename, self.total_rows(), self.bytes, self.duration);
        for sheet in &self.sheets {
            tracing::debug!(sheet = %sheet.name, rows = sheet.rows, "Sheet written");
        }
        tracing::debug!(checksum = %self.checksum, "Artifact checksum");
    }
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Calculate the SHA-256 checksum of an artifact
///
/// # Examples
///
/// ```
/// use tenant_backup::core::export::summary::calculate_checksum;
///
/// let checksum = calculate_checksum(b"workbook");
/// assert_eq!(checksum.len(), 64);
/// ```
pub fn calculate_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    format!("{result:x}")
}
