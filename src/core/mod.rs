//! Core business logic of the export engine.
//!
//! # Modules
//!
//! - [`collector`] - Concurrent, tenant-scoped snapshot collection
//! - [`window`] - Daily movement window and report date parsing
//! - [`projection`] - Records to typed sheet rows
//! - [`workbook`] - Sheet rows to workbook bytes
//! - [`export`] - Orchestration of the two exports
//!
//! # Export Workflow
//!
//! 1. **Window** (movement only): resolve the report date to a UTC interval
//! 2. **Collect**: query every entity kind of the tenant concurrently
//! 3. **Project**: map records to rows, one sheet per entity kind
//! 4. **Serialize**: encode the workbook in memory
//! 5. **Report**: log the export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use tenant_backup::adapters::database::create_repositories;
//! use tenant_backup::config::load_config;
//! use tenant_backup::core::export::ExportOrchestrator;
//! use tenant_backup::domain::TenantId;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tenant-backup.toml")?;
//! let postgresql = config.require_postgresql()?;
//! let repositories = create_repositories(postgresql).await?;
//! let orchestrator = ExportOrchestrator::from_config(repositories, &config.export)?;
//!
//! let tenant = TenantId::new("acme")?;
//! let artifact = orchestrator.daily_movement(&tenant, Some("2024-03-10")).await?;
//! println!("{} ({} bytes)", artifact.filename, artifact.bytes.len());
//! # Ok(())
//! # }
//! ```

pub mod collector;
pub mod export;
pub mod projection;
pub mod window;
pub mod workbook;
