//! PostgreSQL repositories
//!
//! One generic implementation of [`EntityRepository`] serves every entity
//! kind. Tables differ only in their column list and `FROM` clause, which
//! [`StoredRecord`] supplies. Every query filters on `tenant_id = $1`.

use super::client::PostgreSQLClient;
use super::models::{FromRow, CLIENT_COLUMNS, PRODUCT_COLUMNS, SERVICE_ORDER_COLUMNS};
use crate::adapters::database::traits::EntityRepository;
use crate::core::window::Window;
use crate::domain::ids::TenantId;
use crate::domain::records::{Client, Product, ServiceOrder, TenantRecord};
use crate::domain::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Table layout of a record type
pub(crate) trait StoredRecord: FromRow + TenantRecord {
    /// Select list, qualified with [`ALIAS`](Self::ALIAS)
    const COLUMNS: &'static str;
    /// Table (and joins) with the main table aliased
    const FROM: &'static str;
    /// Alias of the main table
    const ALIAS: &'static str;
}

impl StoredRecord for Client {
    const COLUMNS: &'static str = CLIENT_COLUMNS;
    const FROM: &'static str = "clients c";
    const ALIAS: &'static str = "c";
}

impl StoredRecord for Product {
    const COLUMNS: &'static str = PRODUCT_COLUMNS;
    const FROM: &'static str = "products p";
    const ALIAS: &'static str = "p";
}

impl StoredRecord for ServiceOrder {
    const COLUMNS: &'static str = SERVICE_ORDER_COLUMNS;
    const FROM: &'static str =
        "service_orders o LEFT JOIN clients c ON c.id = o.client_id AND c.tenant_id = o.tenant_id";
    const ALIAS: &'static str = "o";
}

/// Newest first, id as tie-breaker
pub(crate) fn list_query<T: StoredRecord>() -> String {
    let a = T::ALIAS;
    format!(
        "SELECT {} FROM {} WHERE {a}.tenant_id = $1 ORDER BY {a}.created_at DESC, {a}.id DESC",
        T::COLUMNS,
        T::FROM
    )
}

/// Half-open window `[$2, $3)`, oldest first
pub(crate) fn window_query<T: StoredRecord>() -> String {
    let a = T::ALIAS;
    format!(
        "SELECT {} FROM {} WHERE {a}.tenant_id = $1 \
         AND {a}.created_at >= $2 AND {a}.created_at < $3 \
         ORDER BY {a}.created_at ASC, {a}.id ASC",
        T::COLUMNS,
        T::FROM
    )
}

/// Read-only store over the business tables
#[derive(Clone)]
pub struct PostgreSQLStore {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLStore {
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

#[async_trait]
impl<T: StoredRecord> EntityRepository<T> for PostgreSQLStore {
    async fn list_by_tenant(&self, tenant: &TenantId) -> Result<Vec<T>> {
        let rows = self
            .client
            .query(T::KIND.as_str(), &list_query::<T>(), &[&tenant.as_str()])
            .await?;

        tracing::debug!(entity = %T::KIND, tenant_id = %tenant, rows = rows.len(), "Listed records");
        rows.iter().map(T::from_row).collect()
    }

    async fn list_by_tenant_and_window(
        &self,
        tenant: &TenantId,
        window: &Window,
    ) -> Result<Vec<T>> {
        let (start, end) = (window.start(), window.end());
        let rows = self
            .client
            .query(
                T::KIND.as_str(),
                &window_query::<T>(),
                &[&tenant.as_str(), &start, &end],
            )
            .await?;

        tracing::debug!(
            entity = %T::KIND,
            tenant_id = %tenant,
            start = %start,
            end = %end,
            rows = rows.len(),
            "Listed records in window"
        );
        rows.iter().map(T::from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries_are_tenant_scoped() {
        for query in [
            list_query::<Client>(),
            list_query::<Product>(),
            list_query::<ServiceOrder>(),
        ] {
            assert!(query.contains(".tenant_id = $1"), "{query}");
        }
    }

    #[test]
    fn test_window_query_is_half_open() {
        let query = window_query::<Product>();
        assert!(query.contains("p.created_at >= $2 AND p.created_at < $3"));
        assert!(query.ends_with("ORDER BY p.created_at ASC, p.id ASC"));
    }

    #[test]
    fn test_service_orders_join_client_name_within_tenant() {
        let query = list_query::<ServiceOrder>();
        assert!(query.contains("LEFT JOIN clients c ON c.id = o.client_id AND c.tenant_id = o.tenant_id"));
        assert!(query.contains("o.tenant_id = $1"));
        assert!(query.contains("ORDER BY o.created_at DESC, o.id DESC"));
    }
}
