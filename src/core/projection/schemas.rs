//! Sheet schemas of the two exports
//!
//! Both exports share column sets. The backup renders timestamps as calendar
//! dates; the movement report keeps the time of day.

use super::{CellValue, Column, ColumnFormat, ProjectionContext, RowSchema};
use crate::domain::records::{Client, Product, ServiceOrder};
use chrono::{DateTime, Utc};

pub const CLIENTS_SHEET: &str = "Clientes";
pub const PRODUCTS_SHEET: &str = "Produtos";
pub const SERVICE_ORDERS_SHEET: &str = "Ordens de Serviço";

/// How record timestamps are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stamp {
    Date,
    DateTime,
}

/// Row schemas for every entity kind of one export
pub struct SchemaRegistry {
    pub clients: RowSchema<Client>,
    pub products: RowSchema<Product>,
    pub service_orders: RowSchema<ServiceOrder>,
}

impl SchemaRegistry {
    /// Full backup: timestamps as calendar dates
    pub fn backup() -> Self {
        Self::with_stamp(Stamp::Date)
    }

    /// Daily movement: timestamps keep time of day
    pub fn movement() -> Self {
        Self::with_stamp(Stamp::DateTime)
    }

    fn with_stamp(stamp: Stamp) -> Self {
        Self {
            clients: clients_schema(stamp),
            products: products_schema(stamp),
            service_orders: service_orders_schema(stamp),
        }
    }

    /// Sheet names in emission order
    pub fn sheet_names(&self) -> [&'static str; 3] {
        [
            self.clients.sheet_name,
            self.products.sheet_name,
            self.service_orders.sheet_name,
        ]
    }
}

fn stamp_column<T>(
    stamp: Stamp,
    header: &'static str,
    as_date: fn(&T, &ProjectionContext) -> CellValue,
    as_datetime: fn(&T, &ProjectionContext) -> CellValue,
) -> Column<T> {
    match stamp {
        Stamp::Date => Column::new(header, ColumnFormat::Date, as_date),
        Stamp::DateTime => Column::new(header, ColumnFormat::DateTime, as_datetime),
    }
}

fn date_cell(ts: DateTime<Utc>, ctx: &ProjectionContext) -> CellValue {
    CellValue::Date(ctx.local_date(ts))
}

fn datetime_cell(ts: DateTime<Utc>, ctx: &ProjectionContext) -> CellValue {
    CellValue::DateTime(ctx.local_datetime(ts))
}

fn clients_schema(stamp: Stamp) -> RowSchema<Client> {
    RowSchema {
        sheet_name: CLIENTS_SHEET,
        columns: vec![
            Column::new("ID", ColumnFormat::Integer, |c: &Client, _| {
                CellValue::Integer(c.id)
            }),
            Column::new("Nome", ColumnFormat::Text, |c: &Client, _| {
                CellValue::Text(c.name.clone())
            }),
            Column::new("CPF/CNPJ", ColumnFormat::Text, |c: &Client, _| {
                CellValue::text_opt(c.document.as_deref())
            }),
            Column::new("E-mail", ColumnFormat::Text, |c: &Client, _| {
                CellValue::text_opt(c.email.as_deref())
            }),
            Column::new("Telefone", ColumnFormat::Text, |c: &Client, _| {
                CellValue::text_opt(c.phone.as_deref())
            }),
            Column::new("Endereço", ColumnFormat::Text, |c: &Client, _| {
                CellValue::text_opt(c.address.as_deref())
            }),
            Column::new("Cidade", ColumnFormat::Text, |c: &Client, _| {
                CellValue::text_opt(c.city.as_deref())
            }),
            stamp_column(
                stamp,
                "Data de Cadastro",
                |c: &Client, ctx| date_cell(c.created_at, ctx),
                |c: &Client, ctx| datetime_cell(c.created_at, ctx),
            ),
        ],
    }
}

fn products_schema(stamp: Stamp) -> RowSchema<Product> {
    RowSchema {
        sheet_name: PRODUCTS_SHEET,
        columns: vec![
            Column::new("ID", ColumnFormat::Integer, |p: &Product, _| {
                CellValue::Integer(p.id)
            }),
            Column::new("Nome", ColumnFormat::Text, |p: &Product, _| {
                CellValue::Text(p.name.clone())
            }),
            Column::new("SKU", ColumnFormat::Text, |p: &Product, _| {
                CellValue::text_opt(p.sku.as_deref())
            }),
            Column::new("Preço de Venda", ColumnFormat::Currency, |p: &Product, _| {
                CellValue::Currency(p.unit_price)
            }),
            Column::new("Preço de Custo", ColumnFormat::Currency, |p: &Product, _| {
                CellValue::currency_opt(p.cost_price)
            }),
            Column::new("Estoque", ColumnFormat::Integer, |p: &Product, _| {
                CellValue::Integer(p.stock_quantity)
            }),
            Column::new("Ativo", ColumnFormat::Boolean, |p: &Product, _| {
                CellValue::Bool(p.active)
            }),
            stamp_column(
                stamp,
                "Data de Cadastro",
                |p: &Product, ctx| date_cell(p.created_at, ctx),
                |p: &Product, ctx| datetime_cell(p.created_at, ctx),
            ),
        ],
    }
}

fn service_orders_schema(stamp: Stamp) -> RowSchema<ServiceOrder> {
    RowSchema {
        sheet_name: SERVICE_ORDERS_SHEET,
        columns: vec![
            Column::new("Número", ColumnFormat::Integer, |o: &ServiceOrder, _| {
                CellValue::Integer(o.number)
            }),
            Column::new("Cliente", ColumnFormat::Text, |o: &ServiceOrder, _| {
                match o.client_name.as_deref() {
                    Some(name) => CellValue::Text(name.to_string()),
                    None => CellValue::Text(format!("#{}", o.client_id)),
                }
            }),
            Column::new("Descrição", ColumnFormat::Text, |o: &ServiceOrder, _| {
                CellValue::text_opt(o.description.as_deref())
            }),
            Column::new("Status", ColumnFormat::Enum, |o: &ServiceOrder, _| {
                CellValue::Text(o.status.label().to_string())
            }),
            Column::new("Valor Total", ColumnFormat::Currency, |o: &ServiceOrder, _| {
                CellValue::Currency(o.total_amount)
            }),
            Column::new("Desconto", ColumnFormat::Currency, |o: &ServiceOrder, _| {
                CellValue::currency_opt(o.discount)
            }),
            Column::new("Valor Líquido", ColumnFormat::Currency, |o: &ServiceOrder, _| {
                CellValue::Currency(o.total_amount - o.discount.unwrap_or(0.0))
            }),
            Column::new("Previsão de Entrega", ColumnFormat::Date, |o: &ServiceOrder, _| {
                o.due_date.map_or(CellValue::Empty, CellValue::Date)
            }),
            stamp_column(
                stamp,
                "Concluída em",
                |o: &ServiceOrder, ctx| {
                    o.completed_at
                        .map_or(CellValue::Empty, |ts| date_cell(ts, ctx))
                },
                |o: &ServiceOrder, ctx| {
                    o.completed_at
                        .map_or(CellValue::Empty, |ts| datetime_cell(ts, ctx))
                },
            ),
            stamp_column(
                stamp,
                "Data de Abertura",
                |o: &ServiceOrder, ctx| date_cell(o.created_at, ctx),
                |o: &ServiceOrder, ctx| datetime_cell(o.created_at, ctx),
            ),
        ],
    }
}
