//! Local vault secret provider.

use async_trait::async_trait;
use reminder_core::error::{ReminderError, Result};
use reminder_core::traits::SecretProvider;
use reminder_core::types::SecretValue;

use crate::store::SecretStore;

/// Serves secrets from a `SecretStore` loaded at startup.
pub struct VaultSecretProvider {
    store: SecretStore,
}

impl VaultSecretProvider {
    pub fn new(store: SecretStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SecretProvider for VaultSecretProvider {
    async fn get_secret(&self, name: &str) -> Result<SecretValue> {
        let fields = self
            .store
            .get(name)
            .ok_or_else(|| ReminderError::SecretNotFound(name.to_string()))?;
        tracing::debug!(
            secret_name = name,
            vault = %self.store.path().display(),
            "Secret loaded from local vault"
        );
        Ok(SecretValue::new(name, fields.clone()))
    }

    fn provider_type(&self) -> &'static str {
        "vault"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_vault_provider_get() {
        let mut store = SecretStore::in_memory();
        store.set("emailCredentials", "username", "bot@corp.com");
        let provider = VaultSecretProvider::new(store);

        let secret = provider.get_secret("emailCredentials").await.unwrap();
        assert_eq!(secret.require("username").unwrap(), "bot@corp.com");
    }

    #[tokio::test]
    async fn test_vault_provider_missing() {
        let provider = VaultSecretProvider::new(SecretStore::in_memory());
        let err = provider.get_secret("emailCredentials").await.unwrap_err();
        assert!(matches!(err, ReminderError::SecretNotFound(n) if n == "emailCredentials"));
    }
}
