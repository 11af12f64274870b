//! Tenant data collector
//!
//! Fans out one query per entity kind for a single tenant and joins them into
//! a [`Snapshot`]. Queries run concurrently; the first failure drops the
//! remaining in-flight futures, and no partial snapshot is ever returned.

use crate::adapters::database::traits::{EntityRepository, Repositories};
use crate::core::window::Window;
use crate::domain::ids::TenantId;
use crate::domain::records::TenantRecord;
use crate::domain::snapshot::Snapshot;
use crate::domain::{EngineError, Result};
use std::time::Duration;

/// Scope reported when the whole collection fails rather than one entity
const SNAPSHOT_SCOPE: &str = "snapshot";

/// Builds tenant snapshots from the store
#[derive(Debug, Clone)]
pub struct TenantDataCollector {
    repositories: Repositories,
    timeout: Option<Duration>,
}

impl TenantDataCollector {
    /// Creates a collector without a time bound
    pub fn new(repositories: Repositories) -> Self {
        Self {
            repositories,
            timeout: None,
        }
    }

    /// Bounds the whole collection; expiry cancels every in-flight query
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Every record of the tenant, newest first per entity kind
    ///
    /// # Errors
    ///
    /// Returns `EngineError::DataAccess` if any query fails, times out, or
    /// yields a record owned by another tenant.
    pub async fn collect(&self, tenant: &TenantId) -> Result<Snapshot> {
        self.bounded(self.fetch(tenant, None)).await
    }

    /// Records of the tenant inside `window`, oldest first per entity kind
    ///
    /// # Errors
    ///
    /// Same failure modes as [`collect`](Self::collect).
    pub async fn collect_windowed(&self, tenant: &TenantId, window: &Window) -> Result<Snapshot> {
        self.bounded(self.fetch(tenant, Some(window))).await
    }

    async fn bounded(
        &self,
        fetch: impl std::future::Future<Output = Result<Snapshot>>,
    ) -> Result<Snapshot> {
        let Some(limit) = self.timeout else {
            return fetch.await;
        };

        match tokio::time::timeout(limit, fetch).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = limit.as_secs_f64(),
                    "Snapshot collection timed out"
                );
                Err(EngineError::data_access(
                    SNAPSHOT_SCOPE,
                    format!("collection did not finish within {:?}", limit),
                ))
            }
        }
    }

    async fn fetch(&self, tenant: &TenantId, window: Option<&Window>) -> Result<Snapshot> {
        let (clients, products, service_orders) = tokio::try_join!(
            fetch_kind(self.repositories.clients.as_ref(), tenant, window),
            fetch_kind(self.repositories.products.as_ref(), tenant, window),
            fetch_kind(self.repositories.service_orders.as_ref(), tenant, window),
        )?;

        let snapshot = Snapshot {
            tenant_id: tenant.clone(),
            clients,
            products,
            service_orders,
        };

        tracing::debug!(
            tenant_id = %tenant,
            windowed = window.is_some(),
            records = snapshot.record_count(),
            "Snapshot collected"
        );

        Ok(snapshot)
    }
}

async fn fetch_kind<T: TenantRecord>(
    repository: &dyn EntityRepository<T>,
    tenant: &TenantId,
    window: Option<&Window>,
) -> Result<Vec<T>> {
    let result = match window {
        Some(window) => repository.list_by_tenant_and_window(tenant, window).await,
        None => repository.list_by_tenant(tenant).await,
    };

    let records = result.map_err(|error| {
        tracing::warn!(entity = %T::KIND, error = %error, "Store query failed");
        match error {
            EngineError::DataAccess { .. } => error,
            other => EngineError::data_access(T::KIND.as_str(), other.to_string()),
        }
    })?;

    if records.iter().any(|record| record.tenant_id() != tenant) {
        tracing::error!(
            entity = %T::KIND,
            tenant_id = %tenant,
            "Store returned a record owned by another tenant"
        );
        return Err(EngineError::data_access(
            T::KIND.as_str(),
            "store returned a record owned by another tenant",
        ));
    }

    Ok(records)
}
