//! Per-run outcome report: who was reminded, who was skipped, who failed.

use chrono::{DateTime, Utc};
use reminder_core::error::{ReminderError, Result};
use reminder_reconcile::{Employee, ObligationSet};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A reminder that was (or, in a dry run, would have been) sent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReminderOutcome {
    pub person_id: String,
    pub recipient: String,
    pub trainings: Vec<String>,
}

/// A reminder that could not be delivered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailedReminder {
    pub person_id: String,
    pub recipient: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Active employees reconciled.
    pub processed: usize,
    /// Active employees with nothing outstanding.
    pub up_to_date: usize,
    pub sent: Vec<ReminderOutcome>,
    /// Reminders rendered but not sent (dry run).
    pub dry_run: Vec<ReminderOutcome>,
    pub failed: Vec<FailedReminder>,
    /// The run stopped early on a delivery failure.
    pub aborted: bool,
}

impl RunReport {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            processed: 0,
            up_to_date: 0,
            sent: Vec::new(),
            dry_run: Vec::new(),
            failed: Vec::new(),
            aborted: false,
        }
    }

    pub fn record_sent(&mut self, employee: &Employee, outstanding: &ObligationSet) {
        self.sent.push(outcome(employee, outstanding));
    }

    pub fn record_dry_run(&mut self, employee: &Employee, outstanding: &ObligationSet) {
        self.dry_run.push(outcome(employee, outstanding));
    }

    pub fn record_failure(&mut self, employee: &Employee, error: &ReminderError) {
        self.failed.push(FailedReminder {
            person_id: employee.person_id.to_string(),
            recipient: employee.email.clone(),
            error: error.to_string(),
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// True when every due reminder went out.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.aborted
    }

    /// One-line summary for the log.
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} processed, {} up to date, {} sent, {} failed",
            self.processed,
            self.up_to_date,
            self.sent.len(),
            self.failed.len()
        );
        if !self.dry_run.is_empty() {
            line.push_str(&format!(", {} dry-run", self.dry_run.len()));
        }
        if self.aborted {
            line.push_str(" (aborted)");
        }
        line
    }

    /// Write the report as pretty JSON.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::debug!("💾 Run report written to {}", path.display());
        Ok(())
    }
}

fn outcome(employee: &Employee, outstanding: &ObligationSet) -> ReminderOutcome {
    ReminderOutcome {
        person_id: employee.person_id.to_string(),
        recipient: employee.email.clone(),
        trainings: outstanding.iter().cloned().collect(),
    }
}
