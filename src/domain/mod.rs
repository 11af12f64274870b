//! Domain models and types for the export engine.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`TenantId`])
//! - **Entity records** ([`Client`], [`Product`], [`ServiceOrder`]) and the
//!   [`TenantRecord`] trait they share
//! - **Snapshots** ([`Snapshot`]) holding one tenant's records
//! - **Error types** ([`EngineError`], [`StageError`])
//! - **Result type alias** ([`Result`])
//!
//! # Tenant Scoping
//!
//! Tenants are identified by a validated newtype so that a raw string can never
//! be passed where a tenant is expected:
//!
//! ```rust
//! use tenant_backup::domain::{Snapshot, TenantId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tenant = TenantId::new("acme")?;
//! let snapshot = Snapshot::empty(tenant);
//! assert!(snapshot.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod records;
pub mod result;
pub mod snapshot;

// Re-export commonly used types for convenience
pub use errors::{EngineError, ErrorKind, ExportStage, StageError};
pub use ids::TenantId;
pub use records::{Client, EntityKind, Product, ServiceOrder, ServiceOrderStatus, TenantRecord};
pub use result::Result;
pub use snapshot::Snapshot;
