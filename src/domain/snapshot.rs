//! Tenant snapshot
//!
//! A point-in-time, in-memory copy of one tenant's records across every
//! exported entity kind. Built fresh per export call, never persisted.

use super::ids::TenantId;
use super::records::{Client, EntityKind, Product, ServiceOrder};

/// One tenant's records, grouped by entity kind
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Tenant every record belongs to
    pub tenant_id: TenantId,
    pub clients: Vec<Client>,
    pub products: Vec<Product>,
    pub service_orders: Vec<ServiceOrder>,
}

impl Snapshot {
    /// Creates an empty snapshot for a tenant
    pub fn empty(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            clients: Vec::new(),
            products: Vec::new(),
            service_orders: Vec::new(),
        }
    }

    /// Number of records of one kind
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Clients => self.clients.len(),
            EntityKind::Products => self.products.len(),
            EntityKind::ServiceOrders => self.service_orders.len(),
        }
    }

    /// Total number of records
    pub fn record_count(&self) -> usize {
        EntityKind::ALL.iter().map(|kind| self.count(*kind)).sum()
    }

    /// True when no entity kind holds a record
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::empty(TenantId::new("t1").unwrap());
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.record_count(), 0);
    }

    #[test]
    fn test_counts() {
        let tenant = TenantId::new("t1").unwrap();
        let mut snapshot = Snapshot::empty(tenant.clone());
        snapshot.clients.push(Client {
            id: 1,
            tenant_id: tenant,
            name: "Maria".into(),
            document: None,
            email: None,
            phone: None,
            address: None,
            city: None,
            created_at: Utc::now(),
        });
        assert_eq!(snapshot.count(EntityKind::Clients), 1);
        assert_eq!(snapshot.count(EntityKind::Products), 0);
        assert_eq!(snapshot.record_count(), 1);
        assert!(!snapshot.is_empty());
    }
}
