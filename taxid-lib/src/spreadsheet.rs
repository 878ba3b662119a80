use anyhow::Result;
use calamine::{Data, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::Workbook;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use thiserror::Error;

use crate::batch::{RawRecord, Record};
use crate::utils::normalize_header;

/// Name given to columns whose header cell is empty
pub const EMPTY_HEADER: &str = "__EMPTY";

#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Could not open workbook '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("Workbook '{path}' has no sheets")]
    NoSheets { path: String },

    #[error("Error reading sheet '{sheet}': {message}")]
    SheetRead { sheet: String, message: String },

    #[error("There are no records to write to '{path}'")]
    NothingToWrite { path: String },

    #[error("Too many columns to write: {count}")]
    TooManyColumns { count: usize },

    #[error("Could not write workbook '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },
}

/// Headers and records of one worksheet.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    headers: Vec<String>,
    records: Vec<RawRecord>,
}

impl Sheet {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|header| header == column)
    }
}

pub struct SheetReader {
    path: String,
    sheet_name: Option<String>,
}

impl SheetReader {
    /// Create a reader for the workbook at `path`. The first sheet is read
    /// unless a sheet name is given.
    pub fn new(path: &str) -> Self {
        SheetReader {
            path: path.to_string(),
            sheet_name: None,
        }
    }

    pub fn sheet_name(mut self, sheet_name: Option<&str>) -> Self {
        self.sheet_name = sheet_name.map(str::to_string);
        self
    }

    /// Read the sheet into records.
    ///
    /// The first row holds the headers; unnamed and repeated headers get
    /// unique names (see [`unique_headers`]). Rows where every cell is empty
    /// are skipped, and empty cells are left out of their record. A cell
    /// holding only whitespace is a value, not an empty cell.
    pub fn read(self) -> Result<Sheet, SpreadsheetError> {
        let mut workbook: Xlsx<_> =
            open_workbook(&self.path).map_err(|source| SpreadsheetError::Open {
                path: self.path.clone(),
                source,
            })?;

        let sheet_name = match self.sheet_name {
            Some(name) => name,
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| SpreadsheetError::NoSheets {
                    path: self.path.clone(),
                })?,
        };

        let range =
            workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| SpreadsheetError::SheetRead {
                    sheet: sheet_name.clone(),
                    message: e.to_string(),
                })?;

        let mut headers: Vec<String> = Vec::new();
        let mut records: Vec<RawRecord> = Vec::new();

        for (row_index, row) in range.rows().enumerate() {
            if row_index == 0 {
                let raw_headers: Vec<String> = row
                    .iter()
                    .map(|cell| normalize_header(&cell.to_string()))
                    .collect();
                headers = unique_headers(&raw_headers);

                continue;
            }

            let is_empty_row = row.iter().all(is_empty_cell);
            if is_empty_row {
                continue;
            }

            let mut fields = Map::new();
            for (header, cell) in headers.iter().zip(row.iter()) {
                if is_empty_cell(cell) {
                    continue;
                }
                fields.insert(header.clone(), cell_to_json(cell));
            }

            records.push(RawRecord::new(range_row_number(&range, row_index), fields));
        }

        Ok(Sheet {
            name: sheet_name,
            headers,
            records,
        })
    }
}

/// Write `records` to a new workbook with a single sheet.
///
/// The header row is the union of the records' columns in order of first
/// appearance; cells a record does not have are left empty.
pub fn write_records<R: Record>(
    path: &str,
    sheet_name: &str,
    records: &[R],
) -> Result<(), SpreadsheetError> {
    if records.is_empty() {
        return Err(SpreadsheetError::NothingToWrite {
            path: path.to_string(),
        });
    }

    let write_error = |source: rust_xlsxwriter::XlsxError| SpreadsheetError::Write {
        path: path.to_string(),
        source,
    };

    let headers = collect_headers(records);
    if headers.len() > usize::from(u16::MAX) {
        return Err(SpreadsheetError::TooManyColumns {
            count: headers.len(),
        });
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).map_err(write_error)?;

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, header)
            .map_err(write_error)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, header) in headers.iter().enumerate() {
            let col = col as u16;
            match record.field(header) {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) => {
                    worksheet.write_string(row, col, s).map_err(write_error)?;
                }
                Some(Value::Bool(b)) => {
                    worksheet.write_boolean(row, col, *b).map_err(write_error)?;
                }
                Some(Value::Number(n)) => match n.as_f64() {
                    Some(f) => {
                        worksheet.write_number(row, col, f).map_err(write_error)?;
                    }
                    None => {
                        worksheet
                            .write_string(row, col, n.to_string())
                            .map_err(write_error)?;
                    }
                },
                Some(other) => {
                    worksheet
                        .write_string(row, col, other.to_string())
                        .map_err(write_error)?;
                }
            }
        }
    }

    workbook.save(path).map_err(write_error)?;

    Ok(())
}

/// Write the invalid records to `path` in a sheet named "Clientes Inválidos".
pub fn write_invalid_records<R: Record>(
    path: &str,
    records: &[R],
) -> Result<(), SpreadsheetError> {
    write_records(path, crate::INVALID_SHEET_NAME, records)
}

/// Export records to CSV with the same header layout as the workbook export
pub fn export_to_csv<R: Record>(csv_path: &str, records: &[R]) -> Result<()> {
    // Quote fields only when necessary (e.g., when they contain commas)
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(csv_path)?;

    let headers = collect_headers(records);
    wtr.write_record(&headers)?;

    for record in records {
        let csv_record: Vec<String> = headers
            .iter()
            .map(|header| match record.field(header) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            })
            .collect();

        wtr.write_record(&csv_record)?;
    }

    wtr.flush()?;

    Ok(())
}

fn collect_headers<R: Record>(records: &[R]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        for (column, _) in record.cells() {
            if !headers.iter().any(|h| h == column) {
                headers.push(column.to_string());
            }
        }
    }
    headers
}

/// 1-based row number in the sheet, accounting for ranges that do not
/// start at the first row
fn range_row_number(range: &calamine::Range<Data>, row_index: usize) -> usize {
    let start_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    start_row + row_index + 1
}

fn is_empty_cell(cell: &Data) -> bool {
    matches!(cell, Data::Empty)
}

/// Give every column a distinct name.
///
/// An empty header becomes `__EMPTY`. A repeated header gets the first free
/// `_1`, `_2`, ... suffix, so `Nome, Nome, Nome` reads as `Nome, Nome_1, Nome_2`
/// and two unnamed columns read as `__EMPTY, __EMPTY_1`.
pub fn unique_headers(raw_headers: &[String]) -> Vec<String> {
    let mut counters: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::with_capacity(raw_headers.len());

    for raw in raw_headers {
        let base = if raw.is_empty() {
            EMPTY_HEADER.to_string()
        } else {
            raw.clone()
        };

        let mut counter = counters.get(&base).copied().unwrap_or(0);
        if counter == 0 {
            counters.insert(base.clone(), 1);
            headers.push(base);
            continue;
        }

        let mut candidate = format!("{base}_{counter}");
        counter += 1;
        while counters.contains_key(&candidate) {
            candidate = format!("{base}_{counter}");
            counter += 1;
        }
        counters.insert(base, counter);
        counters.insert(candidate.clone(), 1);
        headers.push(candidate);
    }

    headers
}

/// Convert a cell to a JSON value. Integral floats become integers so a
/// document typed as a number keeps its digits; dates become ISO-8601 text.
fn cell_to_json(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Error(e) => Value::String(e.to_string()),
        Data::String(s) => Value::String(s.clone()),
        Data::Float(f) => convert_float(*f),
        Data::Int(i) => json!(*i),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => match excel_datetime_to_chrono(dt) {
            Some(datetime) => Value::String(datetime.format("%Y-%m-%dT%H:%M:%S").to_string()),
            None => convert_float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
    }
}

fn convert_float(f: f64) -> Value {
    if f.is_nan() || f.is_infinite() {
        return Value::Null;
    }

    // Check if it's actually an integer (with tolerance for floating point precision)
    if (f.fract().abs() < f64::EPSILON) && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        json!(f as i64)
    } else {
        json!(f)
    }
}

fn excel_datetime_to_chrono(dt: &calamine::ExcelDateTime) -> Option<chrono::NaiveDateTime> {
    use chrono::{Duration, NaiveDate};
    let excel_base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let value = dt.as_f64();
    let days = value as i64;
    let seconds = ((value - days as f64) * 86400.0).round() as i64;
    excel_base
        .checked_add_signed(Duration::try_days(days)?)?
        .checked_add_signed(Duration::try_seconds(seconds)?)
}
