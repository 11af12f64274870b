//! Store abstraction layer
//!
//! Trait-based access to tenant records so the export pipeline works the same
//! against PostgreSQL and the in-memory store.

pub mod factory;
pub mod traits;

pub use factory::create_repositories;
pub use traits::{EntityRepository, Repositories};
