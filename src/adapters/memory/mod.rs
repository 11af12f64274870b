//! In-memory store
//!
//! A read-only fake of the relational store with the same tenant scoping,
//! window semantics and ordering as the PostgreSQL adapter. Failures and
//! latency can be injected per entity kind to exercise the collector's
//! all-or-nothing behaviour.

use crate::adapters::database::traits::EntityRepository;
use crate::core::window::Window;
use crate::domain::ids::TenantId;
use crate::domain::records::{Client, EntityKind, Product, ServiceOrder, TenantRecord};
use crate::domain::{EngineError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Records held by the in-memory store
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    clients: Vec<Client>,
    products: Vec<Product>,
    service_orders: Vec<ServiceOrder>,
    failures: HashMap<EntityKind, String>,
    latency: HashMap<EntityKind, Duration>,
}

impl InMemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds client records
    pub fn with_clients(mut self, clients: impl IntoIterator<Item = Client>) -> Self {
        self.clients.extend(clients);
        self
    }

    /// Adds product records
    pub fn with_products(mut self, products: impl IntoIterator<Item = Product>) -> Self {
        self.products.extend(products);
        self
    }

    /// Adds service order records
    pub fn with_service_orders(mut self, orders: impl IntoIterator<Item = ServiceOrder>) -> Self {
        self.service_orders.extend(orders);
        self
    }

    /// Makes every query against `kind` fail with `message`
    pub fn failing(mut self, kind: EntityKind, message: impl Into<String>) -> Self {
        self.failures.insert(kind, message.into());
        self
    }

    /// Delays every query against `kind`
    pub fn with_latency(mut self, kind: EntityKind, delay: Duration) -> Self {
        self.latency.insert(kind, delay);
        self
    }

    async fn list<T>(&self, tenant: &TenantId, window: Option<&Window>) -> Result<Vec<T>>
    where
        Self: Holds<T>,
        T: TenantRecord,
    {
        if let Some(delay) = self.latency.get(&T::KIND) {
            tokio::time::sleep(*delay).await;
        }

        if let Some(message) = self.failures.get(&T::KIND) {
            return Err(EngineError::data_access(T::KIND.as_str(), message.clone()));
        }

        let mut records: Vec<T> = self
            .records()
            .iter()
            .filter(|record| record.tenant_id() == tenant)
            .filter(|record| window.map_or(true, |w| w.contains(record.recorded_at())))
            .cloned()
            .collect();

        match window {
            Some(_) => records.sort_by_key(|record| record.recorded_at()),
            None => records.sort_by_key(|record| std::cmp::Reverse(record.recorded_at())),
        }

        Ok(records)
    }
}

/// Access to the collection of one record type
pub trait Holds<T> {
    fn records(&self) -> &[T];
}

impl Holds<Client> for InMemoryStore {
    fn records(&self) -> &[Client] {
        &self.clients
    }
}

impl Holds<Product> for InMemoryStore {
    fn records(&self) -> &[Product] {
        &self.products
    }
}

impl Holds<ServiceOrder> for InMemoryStore {
    fn records(&self) -> &[ServiceOrder] {
        &self.service_orders
    }
}

#[async_trait]
impl<T> EntityRepository<T> for InMemoryStore
where
    T: TenantRecord,
    InMemoryStore: Holds<T>,
{
    async fn list_by_tenant(&self, tenant: &TenantId) -> Result<Vec<T>> {
        self.list(tenant, None).await
    }

    async fn list_by_tenant_and_window(
        &self,
        tenant: &TenantId,
        window: &Window,
    ) -> Result<Vec<T>> {
        self.list(tenant, Some(window)).await
    }
}
