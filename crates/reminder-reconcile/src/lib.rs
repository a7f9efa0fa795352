//! # Reminder Reconcile
//!
//! Pure reconciliation logic: which roster rows are active employees, and
//! which trainings each of them still has to complete. No I/O happens here.

pub mod employee;
pub mod engine;

pub use employee::Employee;
pub use engine::{ObligationSet, active_employees, not_completed};

/// Roster column names.
pub mod columns {
    pub const PERSON_ID: &str = "Person ID";
    pub const FIRST_NAME: &str = "First name";
    pub const LAST_NAME: &str = "Last name";
    pub const EMAIL: &str = "Email";
    pub const STATUS: &str = "Status";
    pub const CATEGORY: &str = "Category";
    pub const TRAINING_NAME: &str = "Training name";

    /// Columns the employee roster must have.
    pub const EMPLOYEE_COLUMNS: &[&str] =
        &[PERSON_ID, FIRST_NAME, LAST_NAME, EMAIL, STATUS, CATEGORY];

    /// Columns the training records must have.
    pub const TRAINING_COLUMNS: &[&str] = &[PERSON_ID, TRAINING_NAME];
}
