//! Secret provider trait: one contract, several backends.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::SecretValue;

/// Resolves logical secret names to their values.
///
/// Backends (environment, local vault file, remote secret service) are
/// chosen by configuration; callers only see this trait.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Retrieve a secret by its logical name.
    ///
    /// Returns `ReminderError::SecretNotFound` if the backend has no such secret.
    async fn get_secret(&self, name: &str) -> Result<SecretValue>;

    /// Backend name for logging.
    fn provider_type(&self) -> &'static str;
}
