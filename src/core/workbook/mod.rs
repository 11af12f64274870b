//! Workbook serialization
//!
//! The export pipeline hands projected sheets to a [`WorkbookSerializer`] and
//! receives the finished file as bytes. The concrete file format lives behind
//! the trait; [`XlsxSerializer`] is the production implementation.
//!
//! Sheets are validated before any byte is produced, so a malformed sheet set
//! never yields a partial artifact.

pub mod xlsx;

pub use xlsx::XlsxSerializer;

use crate::config::ExportConfig;
use crate::core::projection::{CellValue, SheetData};
use crate::domain::{EngineError, Result};
use std::collections::HashSet;

/// Longest sheet name spreadsheet applications accept
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Data rows per sheet, header excluded
pub const MAX_SHEET_ROWS: usize = 1_048_575;

/// Characters a single text cell can hold
pub const MAX_CELL_TEXT_LEN: usize = 32_767;

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Turns projected sheets into a binary workbook
pub trait WorkbookSerializer: Send + Sync {
    /// Serializes every sheet, in order, into one in-memory file
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Internal` if the sheet set is invalid or the
    /// encoder fails. No bytes are returned on failure.
    fn write(&self, sheets: &[SheetData]) -> Result<Vec<u8>>;

    /// MIME type of the produced file
    fn content_type(&self) -> &'static str;

    /// File extension without the leading dot
    fn extension(&self) -> &'static str;
}

/// Number format codes applied to typed cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSettings {
    pub currency: String,
    pub decimal: String,
    pub date: String,
    pub datetime: String,
}

impl FormatSettings {
    /// Formats configured in the `[export]` section
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            currency: config.currency_format.clone(),
            date: config.date_format.clone(),
            datetime: config.datetime_format.clone(),
            ..Self::default()
        }
    }
}

impl Default for FormatSettings {
    fn default() -> Self {
        let config = ExportConfig::default();
        Self {
            currency: config.currency_format,
            decimal: "#,##0.00".to_string(),
            date: config.date_format,
            datetime: config.datetime_format,
        }
    }
}

/// Checks the invariants every workbook format shares
///
/// # Errors
///
/// Returns `EngineError::Internal` when there are no sheets, a name is
/// empty, too long, contains a forbidden character or collides with another
/// (case-insensitively), a row's width differs from its header, a sheet
/// exceeds the row limit, a text cell exceeds the cell length limit, or a
/// numeric cell is not finite.
pub fn validate_sheets(sheets: &[SheetData]) -> Result<()> {
    if sheets.is_empty() {
        return Err(EngineError::Internal(
            "a workbook needs at least one sheet".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(sheets.len());
    for sheet in sheets {
        validate_sheet_name(&sheet.name)?;

        if !seen.insert(sheet.name.to_lowercase()) {
            return Err(EngineError::Internal(format!(
                "duplicate sheet name '{}'",
                sheet.name
            )));
        }

        check_row_count(&sheet.name, sheet.rows.len())?;

        for column in &sheet.columns {
            check_text_len(&sheet.name, 0, &column.header)?;
        }

        let width = sheet.columns.len();
        for (index, row) in sheet.rows.iter().enumerate() {
            if row.len() != width {
                return Err(EngineError::Internal(format!(
                    "sheet '{}' row {} has {} cells, expected {}",
                    sheet.name,
                    index + 1,
                    row.len(),
                    width
                )));
            }

            for cell in row {
                if let CellValue::Text(text) = cell {
                    check_text_len(&sheet.name, index + 1, text)?;
                }
            }

            let non_finite = row.iter().any(|cell| match cell {
                CellValue::Number(n) | CellValue::Currency(n) => !n.is_finite(),
                _ => false,
            });
            if non_finite {
                return Err(EngineError::Internal(format!(
                    "sheet '{}' row {} holds a non-finite number",
                    sheet.name,
                    index + 1
                )));
            }
        }
    }

    Ok(())
}

/// The file format caps rows per sheet; a larger entity set cannot be
/// exported as one workbook
fn check_row_count(sheet: &str, rows: usize) -> Result<()> {
    if rows > MAX_SHEET_ROWS {
        return Err(EngineError::Internal(format!(
            "sheet '{sheet}' needs {rows} data rows but the workbook format holds at most \
             {MAX_SHEET_ROWS} per sheet; the export is too large for a single file"
        )));
    }
    Ok(())
}

/// Row 0 is the header
fn check_text_len(sheet: &str, row: usize, text: &str) -> Result<()> {
    let len = text.chars().count();
    if len > MAX_CELL_TEXT_LEN {
        return Err(EngineError::Internal(format!(
            "sheet '{sheet}' row {row} holds a {len}-character text, above the \
             {MAX_CELL_TEXT_LEN}-character cell limit of the workbook format"
        )));
    }
    Ok(())
}

fn validate_sheet_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(EngineError::Internal("sheet name is empty".to_string()));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(EngineError::Internal(format!(
            "sheet name '{name}' is longer than {MAX_SHEET_NAME_LEN} characters"
        )));
    }
    if let Some(bad) = name.chars().find(|c| FORBIDDEN_SHEET_CHARS.contains(c)) {
        return Err(EngineError::Internal(format!(
            "sheet name '{name}' contains forbidden character '{bad}'"
        )));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(EngineError::Internal(format!(
            "sheet name '{name}' cannot start or end with an apostrophe"
        )));
    }
    Ok(())
}
