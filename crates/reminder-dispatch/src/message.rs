//! Reminder message composition.

use reminder_core::config::ReminderTemplateConfig;
use reminder_reconcile::{Employee, ObligationSet};

pub const DEFAULT_SUBJECT: &str = "Remember to complete your training!";

/// A rendered reminder, ready for the notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct ReminderTemplate {
    subject: String,
}

impl Default for ReminderTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_SUBJECT)
    }
}

impl ReminderTemplate {
    pub fn new(subject: &str) -> Self {
        Self {
            subject: subject.to_string(),
        }
    }

    pub fn from_config(config: &ReminderTemplateConfig) -> Self {
        if config.subject.trim().is_empty() {
            Self::default()
        } else {
            Self::new(&config.subject)
        }
    }

    pub fn render(&self, employee: &Employee, outstanding: &ObligationSet) -> ReminderMessage {
        ReminderMessage {
            recipient: employee.email.clone(),
            subject: self.subject.clone(),
            body: format_body(&employee.full_name(), outstanding),
        }
    }
}

/// "Hi, Ann Lee! Remember to complete these trainings: Ethics, Safety."
pub fn format_body(name: &str, outstanding: &ObligationSet) -> String {
    let names = outstanding
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!("Hi, {name}! Remember to complete these trainings: {names}.")
}
