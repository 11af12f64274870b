//! Store abstraction traits
//!
//! The engine reads tenant data only through [`EntityRepository`]. Adapters
//! (PostgreSQL, in-memory) implement it once per record type, and the
//! [`Repositories`] bundle hands the collector one repository per entity kind.

use crate::core::window::Window;
use crate::domain::ids::TenantId;
use crate::domain::records::{Client, Product, ServiceOrder, TenantRecord};
use crate::domain::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Read-only, tenant-scoped access to one entity collection
///
/// Implementations must never return a record owned by another tenant. Store
/// failures surface as `EngineError::DataAccess` naming the entity kind.
#[async_trait]
pub trait EntityRepository<T: TenantRecord>: Send + Sync {
    /// Every record of the tenant, newest first
    ///
    /// # Errors
    ///
    /// Returns a data access error if the underlying query fails.
    async fn list_by_tenant(&self, tenant: &TenantId) -> Result<Vec<T>>;

    /// Records of the tenant with `window.start <= created_at < window.end`,
    /// oldest first
    ///
    /// # Errors
    ///
    /// Returns a data access error if the underlying query fails.
    async fn list_by_tenant_and_window(&self, tenant: &TenantId, window: &Window)
        -> Result<Vec<T>>;
}

/// One repository per exported entity kind
#[derive(Clone)]
pub struct Repositories {
    pub clients: Arc<dyn EntityRepository<Client>>,
    pub products: Arc<dyn EntityRepository<Product>>,
    pub service_orders: Arc<dyn EntityRepository<ServiceOrder>>,
}

impl Repositories {
    /// Builds the bundle from a single store serving every entity kind
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: EntityRepository<Client>
            + EntityRepository<Product>
            + EntityRepository<ServiceOrder>
            + 'static,
    {
        Self {
            clients: store.clone(),
            products: store.clone(),
            service_orders: store,
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
