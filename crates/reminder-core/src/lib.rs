//! # Reminder Core
//!
//! Shared vocabulary for the training reminder job: the error type, the
//! configuration file, the secret/credential types, and the traits that sit
//! between the reconciliation logic and its collaborators (secret stores,
//! mail relays).

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::ReminderConfig;
pub use error::{ReminderError, Result};
