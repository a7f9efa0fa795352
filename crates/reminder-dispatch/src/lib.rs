//! # Reminder Dispatch
//!
//! Runs one reconcile-and-notify pass: load the roster and the training
//! records, remind every active employee with outstanding trainings, and
//! report on the outcome.

pub mod job;
pub mod message;
pub mod report;

pub use job::{DisabledNotifier, ReminderJob};
pub use message::{ReminderMessage, ReminderTemplate};
pub use report::RunReport;

use reminder_core::config::ReminderConfig;
use reminder_core::error::Result;
use reminder_core::traits::Notifier;
use reminder_reconcile::columns::{EMPLOYEE_COLUMNS, TRAINING_COLUMNS};
use reminder_tables::{Table, load_table};

/// Load both input tables and check their headers before anything is sent.
pub fn load_inputs(config: &ReminderConfig) -> Result<(Table, Table)> {
    let employees = load_table(config.employees_file())?;
    employees.require_columns(EMPLOYEE_COLUMNS)?;

    let trainings = load_table(config.trainings_file())?;
    trainings.require_columns(TRAINING_COLUMNS)?;

    tracing::info!(
        "📄 Loaded {} roster row(s) and {} training record(s)",
        employees.len(),
        trainings.len()
    );
    Ok((employees, trainings))
}

/// Full job: load inputs, then remind everyone who is behind.
pub async fn send_training_reminders(
    config: &ReminderConfig,
    notifier: &dyn Notifier,
    dry_run: bool,
) -> Result<RunReport> {
    let (employees, trainings) = load_inputs(config)?;
    ReminderJob::new(notifier, ReminderTemplate::from_config(&config.reminder))
        .with_policy(config.on_failure)
        .dry_run(dry_run)
        .run(&employees, &trainings)
        .await
}
