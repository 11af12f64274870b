//! Export orchestration
//!
//! Runs the collect → project → serialize pipeline for one tenant and returns
//! the finished artifact. Each failure is tagged with the [`ExportStage`] it
//! came from. Nothing is returned before every stage has succeeded.

use super::summary::{calculate_checksum, ExportKind, ExportSummary, SheetSummary};
use crate::adapters::database::Repositories;
use crate::config::ExportConfig;
use crate::core::collector::TenantDataCollector;
use crate::core::projection::{SchemaRegistry, SheetData, TabularProjector};
use crate::core::window::{parse_report_date, today_in, window_for, Window};
use crate::core::workbook::{FormatSettings, WorkbookSerializer, XlsxSerializer};
use crate::domain::ids::TenantId;
use crate::domain::snapshot::Snapshot;
use crate::domain::{EngineError, ExportStage, Result, StageError};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

/// Prefix of full backup filenames
pub const BACKUP_FILE_PREFIX: &str = "backup_completo";

/// Prefix of daily movement filenames
pub const MOVEMENT_FILE_PREFIX: &str = "movimentacao";

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A finished export file, held in memory
#[derive(Debug, Clone)]
pub struct WorkbookArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
    pub summary: ExportSummary,
}

/// `backup_completo_<YYYY-MM-DD_HH-MM-SS>.<ext>`, local time of `now`
pub fn backup_filename(now: DateTime<Utc>, offset: FixedOffset, extension: &str) -> String {
    let local = now.with_timezone(&offset);
    format!(
        "{BACKUP_FILE_PREFIX}_{}.{extension}",
        local.format(BACKUP_TIMESTAMP_FORMAT)
    )
}

/// `movimentacao_<YYYY-MM-DD>.<ext>`
pub fn movement_filename(date: NaiveDate, extension: &str) -> String {
    format!("{MOVEMENT_FILE_PREFIX}_{}.{extension}", date.format("%Y-%m-%d"))
}

/// Coordinates the export pipeline
///
/// Holds no per-call state, so one orchestrator can serve any number of
/// tenants concurrently.
#[derive(Clone)]
pub struct ExportOrchestrator {
    collector: TenantDataCollector,
    projector: TabularProjector,
    serializer: Arc<dyn WorkbookSerializer>,
    offset: FixedOffset,
    clock: Arc<dyn Clock>,
}

impl ExportOrchestrator {
    /// Creates an orchestrator using the system clock
    pub fn new(
        collector: TenantDataCollector,
        serializer: Arc<dyn WorkbookSerializer>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            collector,
            projector: TabularProjector::new(offset),
            serializer,
            offset,
            clock: Arc::new(SystemClock),
        }
    }

    /// Builds an XLSX orchestrator from the `[export]` section
    ///
    /// A `collect_timeout_seconds` of 0 leaves collection unbounded.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Configuration` if the timezone offset is invalid.
    pub fn from_config(repositories: Repositories, config: &ExportConfig) -> Result<Self> {
        let offset = config.offset().map_err(EngineError::Configuration)?;

        let mut collector = TenantDataCollector::new(repositories);
        if config.collect_timeout_seconds > 0 {
            collector =
                collector.with_timeout(Duration::from_secs(config.collect_timeout_seconds));
        }

        let serializer = XlsxSerializer::new(FormatSettings::from_config(config));
        Ok(Self::new(collector, Arc::new(serializer), offset))
    }

    /// Replaces the clock used for "today" and backup timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Operating timezone offset
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Current calendar date in the operating timezone
    pub fn today(&self) -> NaiveDate {
        today_in(self.offset, self.clock.now())
    }

    /// Exports every record of the tenant
    ///
    /// # Errors
    ///
    /// Returns a [`StageError`] tagged `Collect`, `Project` or `Serialize`.
    pub async fn full_backup(&self, tenant: &TenantId) -> std::result::Result<WorkbookArtifact, StageError> {
        let kind = ExportKind::FullBackup;
        let export_id = Uuid::new_v4();
        let span = export_span(export_id, kind, tenant);

        async {
            let started = Instant::now();
            crate::log_export_start!(kind, tenant);

            let filename = backup_filename(self.clock.now(), self.offset, self.serializer.extension());
            let snapshot = self
                .collector
                .collect(tenant)
                .await
                .map_err(|e| StageError::new(ExportStage::Collect, e))?;

            self.finish(export_id, kind, snapshot, &SchemaRegistry::backup(), filename, started)
                .await
        }
        .instrument(span)
        .await
        .inspect_err(|failure| crate::log_stage_failure!(failure))
    }

    /// Exports the records created on one calendar day
    ///
    /// `date` is an ISO calendar date (`YYYY-MM-DD`); `None` means today in
    /// the operating timezone.
    ///
    /// # Errors
    ///
    /// Returns a [`StageError`] tagged `Window` for a malformed date, or
    /// `Collect`, `Project` or `Serialize` for later failures.
    pub async fn daily_movement(
        &self,
        tenant: &TenantId,
        date: Option<&str>,
    ) -> std::result::Result<WorkbookArtifact, StageError> {
        let kind = ExportKind::DailyMovement;
        let export_id = Uuid::new_v4();
        let span = export_span(export_id, kind, tenant);

        async {
            let started = Instant::now();
            crate::log_export_start!(kind, tenant);

            let date = parse_report_date(date, self.today())
                .map_err(|e| StageError::new(ExportStage::Window, e))?;
            let window = window_for(date, self.offset);
            tracing::debug!(
                %date,
                start = %window.start(),
                end = %window.end(),
                "Movement window resolved"
            );

            let snapshot = self
                .collect_window(tenant, &window)
                .await
                .map_err(|e| StageError::new(ExportStage::Collect, e))?;

            let filename = movement_filename(date, self.serializer.extension());
            self.finish(export_id, kind, snapshot, &SchemaRegistry::movement(), filename, started)
                .await
        }
        .instrument(span)
        .await
        .inspect_err(|failure| crate::log_stage_failure!(failure))
    }

    async fn collect_window(&self, tenant: &TenantId, window: &Window) -> Result<Snapshot> {
        let mut snapshot = self.collector.collect_windowed(tenant, window).await?;
        window.retain(&mut snapshot);
        Ok(snapshot)
    }

    async fn finish(
        &self,
        export_id: Uuid,
        kind: ExportKind,
        snapshot: Snapshot,
        registry: &SchemaRegistry,
        filename: String,
        started: Instant,
    ) -> std::result::Result<WorkbookArtifact, StageError> {
        let sheets = self
            .projector
            .project(&snapshot, registry)
            .map_err(|e| StageError::new(ExportStage::Project, e))?;
        let tenant_id = snapshot.tenant_id;

        let sheet_summaries: Vec<SheetSummary> = sheets.iter().map(SheetSummary::from).collect();
        let bytes = self
            .serialize(sheets)
            .await
            .map_err(|e| StageError::new(ExportStage::Serialize, e))?;

        let summary = ExportSummary {
            export_id,
            kind,
            tenant_id,
            filename: filename.clone(),
            sheets: sheet_summaries,
            bytes: bytes.len(),
            checksum: calculate_checksum(&bytes),
            duration: started.elapsed(),
        };
        summary.log_summary();

        Ok(WorkbookArtifact {
            filename,
            content_type: self.serializer.content_type(),
            bytes,
            summary,
        })
    }

    /// Encoding is CPU-bound, so it runs off the async worker threads
    async fn serialize(&self, sheets: Vec<SheetData>) -> Result<Vec<u8>> {
        let serializer = Arc::clone(&self.serializer);
        tokio::task::spawn_blocking(move || serializer.write(&sheets))
            .await
            .map_err(|e| EngineError::Internal(format!("workbook task failed: {e}")))?
    }
}

impl std::fmt::Debug for ExportOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportOrchestrator")
            .field("collector", &self.collector)
            .field("projector", &self.projector)
            .field("format", &self.serializer.extension())
            .field("offset", &self.offset)
            .finish()
    }
}

fn export_span(export_id: Uuid, kind: ExportKind, tenant: &TenantId) -> tracing::Span {
    tracing::info_span!(
        "export",
        export_id = %export_id,
        export_kind = %kind,
        tenant_id = %tenant
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::records::{Client, EntityKind, Product};
    use crate::domain::ErrorKind;
    use chrono::TimeZone;

    fn brt() -> FixedOffset {
        FixedOffset::west_opt(3 * 3600).unwrap()
    }

    fn tenant(id: &str) -> TenantId {
        TenantId::new(id).unwrap()
    }

    fn client(id: i64, owner: &str, created_at: DateTime<Utc>) -> Client {
        Client {
            id,
            tenant_id: tenant(owner),
            name: format!("Cliente {id}"),
            document: None,
            email: None,
            phone: None,
            address: None,
            city: None,
            created_at,
        }
    }

    fn product(id: i64, owner: &str, price: f64) -> Product {
        Product {
            id,
            tenant_id: tenant(owner),
            name: format!("Produto {id}"),
            sku: None,
            unit_price: price,
            cost_price: None,
            stock_quantity: 1,
            active: true,
            created_at: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
        }
    }

    fn orchestrator(store: InMemoryStore) -> ExportOrchestrator {
        let collector = TenantDataCollector::new(Repositories::from_store(Arc::new(store)));
        ExportOrchestrator::new(collector, Arc::new(XlsxSerializer::default()), brt())
            // 2024-03-11 01:30 UTC is 22:30 on the 10th in UTC-3
            .with_clock(Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2024, 3, 11, 1, 30, 0).unwrap(),
            )))
    }

    #[test]
    fn test_filenames() {
        let now = Utc.with_ymd_and_hms(2024, 3, 11, 1, 30, 5).unwrap();
        assert_eq!(
            backup_filename(now, brt(), "xlsx"),
            "backup_completo_2024-03-10_22-30-05.xlsx"
        );
        assert_eq!(
            movement_filename(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(), "xlsx"),
            "movimentacao_2024-03-09.xlsx"
        );
    }

    #[tokio::test]
    async fn test_full_backup_produces_artifact() {
        let store = InMemoryStore::new()
            .with_clients([client(1, "t1", Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap())])
            .with_products([product(1, "t1", 1234.5), product(2, "t2", 9.0)]);

        let artifact = orchestrator(store).full_backup(&tenant("t1")).await.unwrap();

        assert_eq!(artifact.filename, "backup_completo_2024-03-10_22-30-00.xlsx");
        assert!(artifact.content_type.contains("spreadsheetml"));
        assert!(!artifact.bytes.is_empty());
        assert_eq!(artifact.summary.bytes, artifact.bytes.len());
        assert_eq!(artifact.summary.total_rows(), 2);
        let rows: Vec<usize> = artifact.summary.sheets.iter().map(|s| s.rows).collect();
        assert_eq!(rows, vec![1, 1, 0]);
    }

    #[tokio::test]
    async fn test_daily_movement_defaults_to_local_today() {
        let late_evening = Utc.with_ymd_and_hms(2024, 3, 11, 1, 0, 0).unwrap();
        let store = InMemoryStore::new().with_clients([client(1, "t1", late_evening)]);

        let artifact = orchestrator(store)
            .daily_movement(&tenant("t1"), None)
            .await
            .unwrap();

        assert_eq!(artifact.filename, "movimentacao_2024-03-10.xlsx");
        assert_eq!(artifact.summary.sheets[0].rows, 1);
    }

    #[tokio::test]
    async fn test_invalid_date_fails_window_stage() {
        let err = orchestrator(InMemoryStore::new())
            .daily_movement(&tenant("t1"), Some("10/03/2024"))
            .await
            .unwrap_err();

        assert_eq!(err.stage, ExportStage::Window);
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_store_failure_fails_collect_stage() {
        let store = InMemoryStore::new()
            .with_clients([client(1, "t1", Utc::now())])
            .failing(EntityKind::Products, "connection reset");

        let err = orchestrator(store)
            .full_backup(&tenant("t1"))
            .await
            .unwrap_err();

        assert_eq!(err.stage, ExportStage::Collect);
        assert_eq!(err.kind(), ErrorKind::DataAccess);
    }

    #[tokio::test]
    async fn test_non_finite_amount_fails_serialize_stage() {
        let store = InMemoryStore::new().with_products([product(1, "t1", f64::INFINITY)]);

        let err = orchestrator(store)
            .full_backup(&tenant("t1"))
            .await
            .unwrap_err();

        assert_eq!(err.stage, ExportStage::Serialize);
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_from_config_rejects_bad_offset() {
        let config = ExportConfig {
            timezone_offset: "Brasília".to_string(),
            ..ExportConfig::default()
        };
        let repositories = Repositories::from_store(Arc::new(InMemoryStore::new()));
        let err = ExportOrchestrator::from_config(repositories, &config).unwrap_err();
        assert!(matches!(err, EngineError::Configuration(_)));
    }
}
