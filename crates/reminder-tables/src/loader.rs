//! Table loading from workbooks and CSV files.
//!
//! The first row is the header. Rows with no content are dropped. Readers
//! are owned by the load call, so the file is closed on every exit path.

use calamine::{Data, Reader, open_workbook_auto};
use reminder_core::error::{ReminderError, Result};
use std::path::Path;

use crate::table::Table;
use crate::value::Value;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Workbook,
    Csv,
}

impl TableFormat {
    /// Pick a format from the file extension.
    pub fn detect(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "xla" | "ods" => Ok(Self::Workbook),
            "csv" => Ok(Self::Csv),
            _ => Err(ReminderError::FileAccess(format!(
                "{}: unsupported table format '{ext}'",
                path.display()
            ))),
        }
    }
}

/// Load the first sheet of a workbook (or a CSV file) as a table.
pub fn load_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(ReminderError::FileAccess(format!(
            "{}: file not found",
            path.display()
        )));
    }

    let table = match TableFormat::detect(path)? {
        TableFormat::Workbook => load_workbook(path)?,
        TableFormat::Csv => load_csv(path)?,
    };

    tracing::debug!(
        "📄 Loaded {} row(s) x {} column(s) from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

fn load_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ReminderError::FileAccess(format!("{}: {e}", path.display())))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            ReminderError::FileAccess(format!("{}: workbook has no sheets", path.display()))
        })?
        .map_err(|e| ReminderError::FileAccess(format!("{}: {e}", path.display())))?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(cell_value).collect::<Vec<_>>());
    build_table(path, rows)
}

fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ReminderError::FileAccess(format!("{}: {e}", path.display())))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| ReminderError::FileAccess(format!("{}: {e}", path.display())))?;
        rows.push(record.iter().map(Value::parse).collect::<Vec<_>>());
    }
    build_table(path, rows.into_iter())
}

/// Split raw rows into header + body.
fn build_table(path: &Path, rows: impl Iterator<Item = Vec<Value>>) -> Result<Table> {
    let mut rows = rows.filter(|row| row.iter().any(|v| !v.is_empty()));

    let header = rows.next().ok_or_else(|| {
        ReminderError::FileAccess(format!("{}: missing header row", path.display()))
    })?;

    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell.to_string().trim().to_string();
            if name.is_empty() { column_letter(i) } else { name }
        })
        .collect();

    Ok(Table::new(columns, rows.collect()))
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Empty,
        Data::String(s) if s.is_empty() => Value::Empty,
        Data::String(s) => Value::Text(s.clone()),
        Data::Int(i) => Value::Int(*i),
        Data::Float(f) => Value::number(*f),
        Data::Bool(b) => Value::Bool(*b),
        other => Value::Text(other.to_string()),
    }
}

/// Spreadsheet column name for a zero-based index: 0 → A, 25 → Z, 26 → AA.
fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
