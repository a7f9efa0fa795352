//! Error types for the training reminder job.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ReminderError>;

/// Every failure the job can surface.
#[derive(Debug, Error)]
pub enum ReminderError {
    /// Input file missing, unreadable, of an unknown format, or without a header row.
    #[error("File access error: {0}")]
    FileAccess(String),

    /// A table was asked for a column it does not have.
    #[error("Column not found: '{0}'")]
    ColumnNotFound(String),

    /// The mail relay rejected the credentials.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The mail relay refused the message or the network call failed.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// A recipient or sender address could not be used.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Secret not found: '{0}'")]
    SecretNotFound(String),

    /// Secret backend unreachable, or a secret value is malformed.
    #[error("Secret error: {0}")]
    Secret(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReminderError {
    /// Whether this error must abort the whole run.
    ///
    /// Mail errors concern a single recipient; everything else means the
    /// inputs or the environment are unusable.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::Authentication(_) | Self::Delivery(_) | Self::InvalidAddress(_)
        )
    }
}
