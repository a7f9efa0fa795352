//! The reconcile-and-notify pass.
//!
//! Active employees are processed one at a time, in roster order. Each is
//! reconciled against the shared trainings table and, if anything is
//! outstanding, reminded before the next employee is looked at.

use async_trait::async_trait;
use reminder_core::config::FailurePolicy;
use reminder_core::error::{ReminderError, Result};
use reminder_core::traits::Notifier;
use reminder_reconcile::{Employee, active_employees, not_completed};
use reminder_tables::Table;

use crate::message::ReminderTemplate;
use crate::report::RunReport;

/// Stand-in notifier for dry runs, where no mail account is resolved.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send_email(&self, recipient: &str, _subject: &str, _body: &str) -> Result<()> {
        Err(ReminderError::Config(format!(
            "mail delivery is disabled; not sending to {recipient}"
        )))
    }
}

pub struct ReminderJob<'a> {
    notifier: &'a dyn Notifier,
    template: ReminderTemplate,
    policy: FailurePolicy,
    dry_run: bool,
}

impl<'a> ReminderJob<'a> {
    pub fn new(notifier: &'a dyn Notifier, template: ReminderTemplate) -> Self {
        Self {
            notifier,
            template,
            policy: FailurePolicy::default(),
            dry_run: false,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Render and log reminders without sending them.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run over the full roster and trainings table.
    ///
    /// Schema and I/O errors abort with `Err`. Mail errors are recorded in
    /// the report; under `FailurePolicy::Abort` the first one also stops the run.
    pub async fn run(&self, roster: &Table, trainings: &Table) -> Result<RunReport> {
        let employees = active_employees(roster)?;
        tracing::info!(
            "👥 {} active employee(s) out of {} roster row(s)",
            employees.len(),
            roster.len()
        );

        let mut report = RunReport::start();
        for row in employees.rows() {
            let employee = Employee::from_row(&row)?;
            report.processed += 1;

            let outstanding = not_completed(&employee, trainings)?;
            if outstanding.is_empty() {
                tracing::debug!("✅ {} is up to date", employee.full_name());
                report.up_to_date += 1;
                continue;
            }

            let message = self.template.render(&employee, &outstanding);
            if self.dry_run {
                tracing::info!(
                    "📝 [dry-run] {} <{}>: {}",
                    employee.full_name(),
                    message.recipient,
                    message.body
                );
                report.record_dry_run(&employee, &outstanding);
                continue;
            }

            match self
                .notifier
                .send_email(&message.recipient, &message.subject, &message.body)
                .await
            {
                Ok(()) => report.record_sent(&employee, &outstanding),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        person_id = %employee.person_id,
                        "⚠️  Reminder to {} <{}> failed: {e}",
                        employee.full_name(),
                        message.recipient
                    );
                    report.record_failure(&employee, &e);
                    if self.policy == FailurePolicy::Abort {
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        report.finish();
        Ok(report)
    }
}
