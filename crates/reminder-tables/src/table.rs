//! Ordered rows of named-column values.

use reminder_core::error::{ReminderError, Result};
use std::collections::HashSet;
use std::sync::Arc;

use crate::value::Value;

/// A header-derived table.
///
/// Columns are fixed at construction. Every row holds exactly one value per
/// column. Filtering produces a new table sharing the header; the source is
/// never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Arc<[String]>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table. Short rows are padded with `Value::Empty`, long rows truncated.
    pub fn new<I, S>(columns: I, rows: Vec<Vec<Value>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Arc<[String]> = columns.into_iter().map(Into::into).collect();
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column; the first one wins if the header repeats a name.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ReminderError::ColumnNotFound(name.to_string()))
    }

    /// Fail with `ColumnNotFound` on the first name the header lacks.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.column_index(name)?;
        }
        Ok(())
    }

    /// Iterate rows in source order.
    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> + '_ {
        self.rows.iter().map(|values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    pub fn row(&self, index: usize) -> Option<RowRef<'_>> {
        self.rows.get(index).map(|values| RowRef {
            columns: &self.columns,
            values,
        })
    }

    /// Rows where `row[column] == value`, in source order.
    pub fn filter(&self, column: &str, value: &Value) -> Result<Table> {
        let idx = self.column_index(column)?;
        let rows = self
            .rows
            .iter()
            .filter(|row| &row[idx] == value)
            .cloned()
            .collect();
        Ok(Table {
            columns: Arc::clone(&self.columns),
            rows,
        })
    }

    /// Every value of one column, in row order.
    pub fn column_values(&self, column: &str) -> Result<Vec<&Value>> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// The distinct values of one column.
    pub fn distinct_values(&self, column: &str) -> Result<HashSet<&Value>> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }
}

/// A borrowed row with access by column name.
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> RowRef<'a> {
    pub fn get(&self, column: &str) -> Result<&'a Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
            .ok_or_else(|| ReminderError::ColumnNotFound(column.to_string()))
    }

    /// The cell rendered as text.
    pub fn text(&self, column: &str) -> Result<String> {
        Ok(self.get(column)?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Table {
        Table::new(
            ["Person ID", "Status"],
            vec![
                vec![Value::Int(1), "Active".into()],
                vec![Value::Int(2), "Inactive".into()],
                vec![Value::Int(3), "Active".into()],
            ],
        )
    }

    #[test]
    fn test_filter_keeps_matching_rows_in_order() {
        let table = roster();
        let active = table.filter("Status", &"Active".into()).unwrap();
        let ids: Vec<_> = active.column_values("Person ID").unwrap();
        assert_eq!(ids, vec![&Value::Int(1), &Value::Int(3)]);
    }

    #[test]
    fn test_filter_does_not_touch_source() {
        let table = roster();
        let before = table.clone();
        let _ = table.filter("Status", &"Inactive".into()).unwrap();
        assert_eq!(table, before);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_filter_unknown_column() {
        let err = roster().filter("Category", &"Employee".into()).unwrap_err();
        assert!(matches!(err, ReminderError::ColumnNotFound(c) if c == "Category"));
    }

    #[test]
    fn test_filter_no_matches_keeps_header() {
        let none = roster().filter("Status", &"Retired".into()).unwrap();
        assert!(none.is_empty());
        assert_eq!(none.columns(), roster().columns());
    }

    #[test]
    fn test_distinct_values() {
        let table = roster();
        let statuses = table.distinct_values("Status").unwrap();
        assert_eq!(statuses.len(), 2);
        assert!(statuses.contains(&Value::from("Inactive")));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = Table::new(["a", "b"], vec![vec![Value::Int(1)]]);
        let row = table.row(0).unwrap();
        assert_eq!(row.get("b").unwrap(), &Value::Empty);
    }

    #[test]
    fn test_row_access_by_name() {
        let table = roster();
        let row = table.row(1).unwrap();
        assert_eq!(row.text("Status").unwrap(), "Inactive");
        assert!(row.get("Email").is_err());
    }

    #[test]
    fn test_require_columns() {
        let table = roster();
        assert!(table.require_columns(&["Person ID", "Status"]).is_ok());
        let err = table.require_columns(&["Person ID", "Email"]).unwrap_err();
        assert_eq!(err.to_string(), "Column not found: 'Email'");
    }
}
