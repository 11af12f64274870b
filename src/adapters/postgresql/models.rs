//! Row mapping for the business tables
//!
//! Each entity kind has one `SELECT` column list and a mapper that turns a
//! row into a domain record. Money columns are cast to `float8` in SQL so
//! they map straight to `f64`; integer keys are widened to `int8`.

use crate::domain::ids::TenantId;
use crate::domain::records::{Client, EntityKind, Product, ServiceOrder, ServiceOrderStatus};
use crate::domain::{EngineError, Result};
use chrono::{DateTime, NaiveDate, Utc};
use tokio_postgres::types::FromSql;
use tokio_postgres::Row;

pub(crate) const CLIENT_COLUMNS: &str = "c.id::int8 AS id, c.tenant_id, c.name, c.document, c.email, \
     c.phone, c.address, c.city, c.created_at";

pub(crate) const PRODUCT_COLUMNS: &str = "p.id::int8 AS id, p.tenant_id, p.name, p.sku, \
     p.unit_price::float8 AS unit_price, p.cost_price::float8 AS cost_price, \
     p.stock_quantity::int8 AS stock_quantity, p.active, p.created_at";

pub(crate) const SERVICE_ORDER_COLUMNS: &str = "o.id::int8 AS id, o.tenant_id, o.number::int8 AS number, \
     o.client_id::int8 AS client_id, c.name AS client_name, o.description, o.status, \
     o.total_amount::float8 AS total_amount, o.discount::float8 AS discount, \
     o.due_date, o.completed_at, o.created_at";

/// Maps one row into a record of a given kind
pub(crate) trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}

fn column<'a, T: FromSql<'a>>(row: &'a Row, kind: EntityKind, name: &str) -> Result<T> {
    row.try_get(name).map_err(|e| {
        EngineError::data_access(kind.as_str(), format!("cannot read column '{name}': {e}"))
    })
}

fn tenant(row: &Row, kind: EntityKind) -> Result<TenantId> {
    let raw: String = column(row, kind, "tenant_id")?;
    TenantId::new(raw).map_err(|e| EngineError::data_access(kind.as_str(), e))
}

impl FromRow for Client {
    fn from_row(row: &Row) -> Result<Self> {
        let kind = EntityKind::Clients;
        Ok(Self {
            id: column(row, kind, "id")?,
            tenant_id: tenant(row, kind)?,
            name: column(row, kind, "name")?,
            document: column(row, kind, "document")?,
            email: column(row, kind, "email")?,
            phone: column(row, kind, "phone")?,
            address: column(row, kind, "address")?,
            city: column(row, kind, "city")?,
            created_at: column::<DateTime<Utc>>(row, kind, "created_at")?,
        })
    }
}

impl FromRow for Product {
    fn from_row(row: &Row) -> Result<Self> {
        let kind = EntityKind::Products;
        Ok(Self {
            id: column(row, kind, "id")?,
            tenant_id: tenant(row, kind)?,
            name: column(row, kind, "name")?,
            sku: column(row, kind, "sku")?,
            unit_price: column(row, kind, "unit_price")?,
            cost_price: column(row, kind, "cost_price")?,
            stock_quantity: column(row, kind, "stock_quantity")?,
            active: column(row, kind, "active")?,
            created_at: column::<DateTime<Utc>>(row, kind, "created_at")?,
        })
    }
}

impl FromRow for ServiceOrder {
    fn from_row(row: &Row) -> Result<Self> {
        let kind = EntityKind::ServiceOrders;
        let status: String = column(row, kind, "status")?;
        Ok(Self {
            id: column(row, kind, "id")?,
            tenant_id: tenant(row, kind)?,
            number: column(row, kind, "number")?,
            client_id: column(row, kind, "client_id")?,
            client_name: column(row, kind, "client_name")?,
            description: column(row, kind, "description")?,
            status: ServiceOrderStatus::from_db(&status),
            total_amount: column(row, kind, "total_amount")?,
            discount: column(row, kind, "discount")?,
            due_date: column::<Option<NaiveDate>>(row, kind, "due_date")?,
            completed_at: column::<Option<DateTime<Utc>>>(row, kind, "completed_at")?,
            created_at: column::<DateTime<Utc>>(row, kind, "created_at")?,
        })
    }
}
