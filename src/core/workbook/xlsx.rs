//! XLSX serializer built on `umya-spreadsheet`
//!
//! Typed cells keep their type in the file: numbers and currency are numeric
//! cells with a number format, dates are date serials with a date format, and
//! text is always written as a string so values such as document numbers are
//! never coerced into numbers.
//!
//! Characters XML 1.0 cannot carry are written as `_xHHHH_` escapes, the
//! form spreadsheet applications decode back into the original character.

use super::{validate_sheets, FormatSettings, WorkbookSerializer};
use crate::core::projection::{CellValue, SheetData};
use crate::domain::{EngineError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::borrow::Cow;
use std::io::Cursor;
use umya_spreadsheet::{Spreadsheet, Worksheet};

/// MIME type of Office Open XML workbooks
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Writes `.xlsx` workbooks entirely in memory
#[derive(Debug, Clone, Default)]
pub struct XlsxSerializer {
    formats: FormatSettings,
}

impl XlsxSerializer {
    pub fn new(formats: FormatSettings) -> Self {
        Self { formats }
    }

    fn build(&self, sheets: &[SheetData]) -> Result<Spreadsheet> {
        let mut book = umya_spreadsheet::new_file_empty_worksheet();

        for sheet in sheets {
            let worksheet = book.new_sheet(&sheet.name).map_err(|e| {
                EngineError::Internal(format!("cannot create sheet '{}': {e}", sheet.name))
            })?;
            self.fill(worksheet, sheet);
        }

        Ok(book)
    }

    fn fill(&self, worksheet: &mut Worksheet, sheet: &SheetData) {
        for (index, column) in sheet.columns.iter().enumerate() {
            let coordinate = (index as u32 + 1, 1);
            worksheet
                .get_cell_mut(coordinate)
                .set_value_string(escape_cell_text(&column.header));
            worksheet
                .get_style_mut(coordinate)
                .get_font_mut()
                .set_bold(true);
        }

        // Row counts are bounded by validate_sheets, so the casts cannot truncate
        for (row_index, row) in sheet.rows.iter().enumerate() {
            let row_number = row_index as u32 + 2;
            for (col_index, cell) in row.iter().enumerate() {
                self.write_cell(worksheet, (col_index as u32 + 1, row_number), cell);
            }
        }
    }

    fn write_cell(&self, worksheet: &mut Worksheet, coordinate: (u32, u32), cell: &CellValue) {
        let format = match cell {
            CellValue::Empty => None,
            CellValue::Text(text) => {
                worksheet
                    .get_cell_mut(coordinate)
                    .set_value_string(escape_cell_text(text));
                None
            }
            CellValue::Integer(value) => {
                worksheet
                    .get_cell_mut(coordinate)
                    .set_value_number(*value as f64);
                None
            }
            CellValue::Number(value) => {
                worksheet.get_cell_mut(coordinate).set_value_number(*value);
                Some(&self.formats.decimal)
            }
            CellValue::Currency(value) => {
                worksheet.get_cell_mut(coordinate).set_value_number(*value);
                Some(&self.formats.currency)
            }
            CellValue::Date(date) => {
                worksheet
                    .get_cell_mut(coordinate)
                    .set_value_number(date_serial(*date));
                Some(&self.formats.date)
            }
            CellValue::DateTime(datetime) => {
                worksheet
                    .get_cell_mut(coordinate)
                    .set_value_number(datetime_serial(*datetime));
                Some(&self.formats.datetime)
            }
            CellValue::Bool(value) => {
                worksheet.get_cell_mut(coordinate).set_value_bool(*value);
                None
            }
        };

        if let Some(code) = format {
            worksheet
                .get_style_mut(coordinate)
                .get_number_format_mut()
                .set_format_code(code.clone());
        }
    }
}

impl WorkbookSerializer for XlsxSerializer {
    fn write(&self, sheets: &[SheetData]) -> Result<Vec<u8>> {
        validate_sheets(sheets)?;

        let book = self.build(sheets)?;

        let mut cursor = Cursor::new(Vec::new());
        umya_spreadsheet::writer::xlsx::write_writer(&book, &mut cursor)
            .map_err(|e| EngineError::Internal(format!("failed to encode workbook: {e}")))?;

        Ok(cursor.into_inner())
    }

    fn content_type(&self) -> &'static str {
        XLSX_CONTENT_TYPE
    }

    fn extension(&self) -> &'static str {
        "xlsx"
    }
}

/// Makes text safe for a shared-strings entry
///
/// Characters outside the XML 1.0 character range become `_xHHHH_`. Text
/// that already reads like such an escape gets its underscore escaped as
/// `_x005F_` so readers keep it literal.
pub fn escape_cell_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) && !text.contains("_x") {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for (index, c) in text.char_indices() {
        if c == '_' && starts_with_escape(&text[index..]) {
            escaped.push_str("_x005F_");
        } else if is_xml_char(c) {
            escaped.push(c);
        } else {
            escaped.push_str(&format!("_x{:04X}_", u32::from(c)));
        }
    }
    Cow::Owned(escaped)
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

fn starts_with_escape(rest: &str) -> bool {
    let bytes = rest.as_bytes();
    bytes.len() >= 7
        && bytes[0] == b'_'
        && bytes[1] == b'x'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
        && bytes[6] == b'_'
}

fn serial_epoch() -> NaiveDate {
    // 1899-12-30 absorbs the spreadsheet 1900 leap-year quirk for modern dates
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

/// Spreadsheet serial number of a calendar date
pub fn date_serial(date: NaiveDate) -> f64 {
    (date - serial_epoch()).num_days() as f64
}

/// Spreadsheet serial number of a wall-clock timestamp
pub fn datetime_serial(datetime: NaiveDateTime) -> f64 {
    let seconds = datetime.time().num_seconds_from_midnight() as f64;
    date_serial(datetime.date()) + seconds / SECONDS_PER_DAY
}

/// Inverse of [`date_serial`] for whole days
pub fn date_from_serial(serial: f64) -> Option<NaiveDate> {
    serial_epoch().checked_add_signed(chrono::Duration::days(serial.floor() as i64))
}

/// Inverse of [`datetime_serial`], to the second
pub fn datetime_from_serial(serial: f64) -> Option<NaiveDateTime> {
    let date = date_from_serial(serial)?;
    let seconds = ((serial - serial.floor()) * SECONDS_PER_DAY).round() as u32;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds.min(86_399), 0)?;
    Some(date.and_time(time))
}
