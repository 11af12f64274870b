// Tenant Backup - Tenant-scoped workbook exports
// Copyright (c) 2025 Tenant Backup Contributors
// Licensed under the MIT License

//! # Tenant Backup
//!
//! Export engine for multi-tenant business-management backends. It reads one
//! tenant's clients, products and service orders and turns them into a
//! spreadsheet workbook, either as a full backup or as the movement of a
//! single calendar day.
//!
//! ## Overview
//!
//! - **Collecting** every entity kind of a tenant concurrently, never mixing tenants
//! - **Windowing** records to one local calendar day as a half-open UTC interval
//! - **Projecting** records into typed rows, one sheet per entity kind
//! - **Serializing** the workbook in memory so a failure never leaves a partial file
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`server`] - HTTP transport
//! - [`core`] - Business logic (collect, window, project, serialize, orchestrate)
//! - [`adapters`] - External integrations (PostgreSQL, identity, in-memory store)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use tenant_backup::adapters::database::Repositories;
//! use tenant_backup::adapters::memory::InMemoryStore;
//! use tenant_backup::config::ExportConfig;
//! use tenant_backup::core::export::ExportOrchestrator;
//! use tenant_backup::domain::TenantId;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repositories = Repositories::from_store(Arc::new(InMemoryStore::new()));
//! let orchestrator = ExportOrchestrator::from_config(repositories, &ExportConfig::default())?;
//!
//! let tenant = TenantId::new("acme")?;
//! let artifact = orchestrator.daily_movement(&tenant, Some("2024-03-10")).await?;
//! assert_eq!(artifact.filename, "movimentacao_2024-03-10.xlsx");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Engine operations return [`domain::EngineError`]; the orchestrator tags it
//! with the failing [`domain::ExportStage`] as a [`domain::StageError`]. The
//! error kind decides the HTTP status and the CLI exit code.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod server;
