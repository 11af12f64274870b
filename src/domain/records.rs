//! Business entity records
//!
//! Read-only copies of the rows the relational store owns. The engine never
//! mutates them; they live for the duration of one export call.

use super::ids::TenantId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity collections the engine exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Customers of the tenant
    Clients,
    /// Catalogue items
    Products,
    /// Service orders
    ServiceOrders,
}

impl EntityKind {
    /// All kinds, in the order sheets are emitted
    pub const ALL: [EntityKind; 3] = [
        EntityKind::Clients,
        EntityKind::Products,
        EntityKind::ServiceOrders,
    ];

    /// Stable machine name used in logs and error scopes
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Clients => "clients",
            EntityKind::Products => "products",
            EntityKind::ServiceOrders => "service_orders",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common accessors of every tenant-owned record
pub trait TenantRecord: Clone + Send + Sync + 'static {
    /// Entity kind of the record type
    const KIND: EntityKind;

    /// Owning tenant
    fn tenant_id(&self) -> &TenantId;

    /// Creation/movement timestamp used for ordering and windowing
    fn recorded_at(&self) -> DateTime<Utc>;
}

/// A customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub tenant_id: TenantId,
    pub name: String,
    /// CPF or CNPJ
    pub document: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TenantRecord for Client {
    const KIND: EntityKind = EntityKind::Clients;

    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A catalogue item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub tenant_id: TenantId,
    pub name: String,
    pub sku: Option<String>,
    pub unit_price: f64,
    pub cost_price: Option<f64>,
    pub stock_quantity: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl TenantRecord for Product {
    const KIND: EntityKind = EntityKind::Products;

    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Lifecycle state of a service order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceOrderStatus {
    Open,
    InProgress,
    Completed,
    Delivered,
    Cancelled,
    /// Status text the engine does not know; kept verbatim
    Other(String),
}

impl ServiceOrderStatus {
    /// Parses the status column of the store
    ///
    /// Never fails: unknown values are preserved so the extractor stays total.
    pub fn from_db(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "open" | "aberta" => Self::Open,
            "in_progress" | "em_andamento" => Self::InProgress,
            "completed" | "concluida" => Self::Completed,
            "delivered" | "entregue" => Self::Delivered,
            "cancelled" | "canceled" | "cancelada" => Self::Cancelled,
            _ => Self::Other(value.to_string()),
        }
    }

    /// Display label used in the workbook
    pub fn label(&self) -> &str {
        match self {
            Self::Open => "Aberta",
            Self::InProgress => "Em andamento",
            Self::Completed => "Concluída",
            Self::Delivered => "Entregue",
            Self::Cancelled => "Cancelada",
            Self::Other(raw) => raw,
        }
    }
}

/// A service order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub id: i64,
    pub tenant_id: TenantId,
    /// Human-facing order number
    pub number: i64,
    pub client_id: i64,
    /// Client name joined from the clients table, when available
    pub client_name: Option<String>,
    pub description: Option<String>,
    pub status: ServiceOrderStatus,
    pub total_amount: f64,
    pub discount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TenantRecord for ServiceOrder {
    const KIND: EntityKind = EntityKind::ServiceOrders;

    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
