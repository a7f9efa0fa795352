//! # Reminder Tables
//!
//! Header-derived tables with named columns, loaded from the first sheet of
//! a workbook or from a CSV file. All transformations return new tables and
//! never touch their source.

pub mod loader;
pub mod table;
pub mod value;

pub use loader::load_table;
pub use table::{RowRef, Table};
pub use value::Value;
