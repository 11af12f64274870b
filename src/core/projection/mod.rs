//! Tabular projection
//!
//! Maps tenant records into flat rows, one sheet per entity kind. Each sheet
//! is described by a [`RowSchema`]: an ordered list of columns, each with a
//! header label, a [`ColumnFormat`] hint and a total extractor function.
//!
//! Output is type-erased into [`SheetData`] so the serializer never needs to
//! know about entity types.

pub mod schemas;

pub use schemas::SchemaRegistry;

use crate::domain::records::TenantRecord;
use crate::domain::snapshot::Snapshot;
use crate::domain::{EngineError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// One cell of a projected row
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing optional value
    Empty,
    Text(String),
    Integer(i64),
    Number(f64),
    /// Monetary amount, written as a number with a currency format
    Currency(f64),
    /// Calendar date in the operating timezone
    Date(NaiveDate),
    /// Wall-clock timestamp in the operating timezone
    DateTime(NaiveDateTime),
    Bool(bool),
}

impl CellValue {
    /// Text cell, or `Empty` for `None`
    pub fn text_opt(value: Option<&str>) -> Self {
        match value {
            Some(text) => CellValue::Text(text.to_string()),
            None => CellValue::Empty,
        }
    }

    /// Currency cell, or `Empty` for `None`
    pub fn currency_opt(value: Option<f64>) -> Self {
        value.map_or(CellValue::Empty, CellValue::Currency)
    }
}

/// Display hint of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnFormat {
    Text,
    Integer,
    Decimal,
    Currency,
    Date,
    DateTime,
    /// Closed set of labels, rendered as text
    Enum,
    Boolean,
}

impl ColumnFormat {
    /// Whether a cell may appear in a column of this format
    ///
    /// `Empty` is accepted everywhere so optional fields stay total.
    pub fn accepts(self, cell: &CellValue) -> bool {
        matches!(
            (self, cell),
            (_, CellValue::Empty)
                | (ColumnFormat::Text | ColumnFormat::Enum, CellValue::Text(_))
                | (ColumnFormat::Integer, CellValue::Integer(_))
                | (ColumnFormat::Decimal, CellValue::Number(_) | CellValue::Integer(_))
                | (ColumnFormat::Currency, CellValue::Currency(_))
                | (ColumnFormat::Date, CellValue::Date(_))
                | (ColumnFormat::DateTime, CellValue::DateTime(_))
                | (ColumnFormat::Boolean, CellValue::Bool(_))
        )
    }
}

/// Settings extractors need beyond the record itself
#[derive(Debug, Clone, Copy)]
pub struct ProjectionContext {
    offset: FixedOffset,
}

impl ProjectionContext {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Calendar date of `ts` in the operating timezone
    pub fn local_date(&self, ts: DateTime<Utc>) -> NaiveDate {
        ts.with_timezone(&self.offset).date_naive()
    }

    /// Wall-clock time of `ts` in the operating timezone
    pub fn local_datetime(&self, ts: DateTime<Utc>) -> NaiveDateTime {
        ts.with_timezone(&self.offset).naive_local()
    }
}

/// Extractor of one cell; must be total over the record type
pub type Extractor<T> = fn(&T, &ProjectionContext) -> CellValue;

/// A column of a sheet
pub struct Column<T> {
    pub header: &'static str,
    pub format: ColumnFormat,
    pub extract: Extractor<T>,
}

impl<T> Column<T> {
    pub const fn new(header: &'static str, format: ColumnFormat, extract: Extractor<T>) -> Self {
        Self {
            header,
            format,
            extract,
        }
    }
}

/// Ordered column definitions of one sheet
pub struct RowSchema<T> {
    pub sheet_name: &'static str,
    pub columns: Vec<Column<T>>,
}

impl<T: TenantRecord> RowSchema<T> {
    /// Projects `records` into a sheet, checking every cell against its column
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Internal` naming the sheet, column and row when an
    /// extractor produces a cell its column format does not accept.
    pub fn project(&self, records: &[T], context: &ProjectionContext) -> Result<SheetData> {
        let mut rows = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            let mut row = Vec::with_capacity(self.columns.len());
            for column in &self.columns {
                let cell = (column.extract)(record, context);
                if !column.format.accepts(&cell) {
                    return Err(EngineError::Internal(format!(
                        "sheet '{}' column '{}' row {}: {:?} cell in a {:?} column",
                        self.sheet_name,
                        column.header,
                        index + 1,
                        cell,
                        column.format
                    )));
                }
                row.push(cell);
            }
            rows.push(row);
        }

        Ok(SheetData {
            name: self.sheet_name.to_string(),
            columns: self
                .columns
                .iter()
                .map(|column| ColumnSpec {
                    header: column.header.to_string(),
                    format: column.format,
                })
                .collect(),
            rows,
        })
    }
}

/// Header and format of a projected column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub header: String,
    pub format: ColumnFormat,
}

/// A projected sheet, ready for serialization
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetData {
    /// Number of data rows, header excluded
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Projects snapshots with a fixed operating timezone
#[derive(Debug, Clone, Copy)]
pub struct TabularProjector {
    context: ProjectionContext,
}

impl TabularProjector {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            context: ProjectionContext::new(offset),
        }
    }

    /// One sheet per entity kind, in the registry's fixed order
    ///
    /// Entity kinds without records still yield a header-only sheet.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Internal` on a schema/extractor mismatch.
    pub fn project(&self, snapshot: &Snapshot, registry: &SchemaRegistry) -> Result<Vec<SheetData>> {
        let sheets = vec![
            registry.clients.project(&snapshot.clients, &self.context)?,
            registry.products.project(&snapshot.products, &self.context)?,
            registry
                .service_orders
                .project(&snapshot.service_orders, &self.context)?,
        ];

        tracing::debug!(
            tenant_id = %snapshot.tenant_id,
            sheets = sheets.len(),
            rows = sheets.iter().map(SheetData::row_count).sum::<usize>(),
            "Snapshot projected"
        );

        Ok(sheets)
    }
}
