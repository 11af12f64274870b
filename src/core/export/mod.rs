//! Export orchestration and reporting
//!
//! This module provides the two export entry points:
//! - Full backup of every tenant record
//! - Daily movement report of one calendar day
//!
//! Both run the same pipeline and finish with an [`ExportSummary`].

pub mod orchestrator;
pub mod summary;

pub use orchestrator::{
    backup_filename, movement_filename, Clock, ExportOrchestrator, FixedClock, SystemClock,
    WorkbookArtifact,
};
pub use summary::{ExportKind, ExportSummary, SheetSummary};
