//! Roster rows as typed employees.

use reminder_core::error::Result;
use reminder_tables::{RowRef, Value};

use crate::columns;

/// One roster entry. Read-only for the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub person_id: Value,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: String,
    pub category: String,
}

impl Employee {
    /// Extract the roster attributes from a row.
    ///
    /// A missing column surfaces as `ReminderError::ColumnNotFound`.
    pub fn from_row(row: &RowRef<'_>) -> Result<Self> {
        Ok(Self {
            person_id: row.get(columns::PERSON_ID)?.clone(),
            first_name: row.text(columns::FIRST_NAME)?.trim().to_string(),
            last_name: row.text(columns::LAST_NAME)?.trim().to_string(),
            email: row.text(columns::EMAIL)?.trim().to_string(),
            status: row.text(columns::STATUS)?,
            category: row.text(columns::CATEGORY)?,
        })
    }

    /// "First Last", collapsing a missing part.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
