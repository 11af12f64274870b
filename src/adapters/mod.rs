//! External system integrations.
//!
//! - [`database`] - Repository traits and the production factory
//! - [`postgresql`] - PostgreSQL implementation of the repositories
//! - [`memory`] - In-memory store for tests and demos
//! - [`identity`] - Caller credential to tenant resolution
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the export
//! pipeline can be tested against in-memory implementations:
//!
//! ```rust
//! use std::sync::Arc;
//! use tenant_backup::adapters::database::Repositories;
//! use tenant_backup::adapters::memory::InMemoryStore;
//!
//! let repositories = Repositories::from_store(Arc::new(InMemoryStore::new()));
//! # let _ = repositories;
//! ```

pub mod database;
pub mod identity;
pub mod memory;
pub mod postgresql;
