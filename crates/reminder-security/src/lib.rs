//! # Reminder Security
//!
//! Secret backends behind the `SecretProvider` trait. The backend is picked
//! from `[secrets] backend` in the configuration:
//!
//! - `env`: JSON object in an environment variable
//! - `vault`: local vault file, optionally AES-256 encrypted at rest
//! - `remote`: HTTP secret service

pub mod provider;
pub mod store;

use reminder_core::config::{SecretBackend, SecretsConfig, expand_path};
use reminder_core::error::Result;
use reminder_core::traits::SecretProvider;
use reminder_core::types::MailCredentials;
use std::time::Duration;

pub use provider::env::EnvSecretProvider;
pub use provider::remote::RemoteSecretProvider;
pub use provider::vault::VaultSecretProvider;
pub use store::SecretStore;

/// Build the configured secret provider.
pub fn build_provider(config: &SecretsConfig) -> Result<Box<dyn SecretProvider>> {
    let provider: Box<dyn SecretProvider> = match config.backend {
        SecretBackend::Env => Box::new(EnvSecretProvider::new(config.env_mappings.clone())),
        SecretBackend::Vault => {
            let store = SecretStore::load_from(&expand_path(&config.vault_path), config.encrypt)?;
            Box::new(VaultSecretProvider::new(store))
        }
        SecretBackend::Remote => {
            let token = std::env::var(&config.remote_token_env)
                .ok()
                .filter(|t| !t.is_empty());
            if token.is_none() {
                tracing::warn!(
                    "⚠️  {} is not set — querying the secret service without a token",
                    config.remote_token_env
                );
            }
            Box::new(RemoteSecretProvider::new(
                &config.remote_url,
                token,
                Duration::from_secs(10),
            )?)
        }
    };
    tracing::debug!("🔐 Secret backend: {}", provider.provider_type());
    Ok(provider)
}

/// Resolve `{username, password}` stored under `key`.
pub async fn resolve_credentials(
    provider: &dyn SecretProvider,
    key: &str,
) -> Result<MailCredentials> {
    let secret = provider.get_secret(key).await?;
    let creds = MailCredentials::from_secret(&secret)?;
    tracing::info!(
        "🔐 Mail credentials for {} resolved via {}",
        creds.username,
        provider.provider_type()
    );
    Ok(creds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reminder_core::error::ReminderError;

    #[tokio::test]
    async fn test_build_vault_provider_and_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.json");
        std::fs::write(
            &path,
            r#"{"emailCredentials": {"username": "bot@corp.com", "password": "hunter2"}}"#,
        )
        .unwrap();

        let config = SecretsConfig {
            backend: SecretBackend::Vault,
            vault_path: path.to_string_lossy().to_string(),
            ..Default::default()
        };
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.provider_type(), "vault");

        let creds = resolve_credentials(provider.as_ref(), "emailCredentials")
            .await
            .unwrap();
        assert_eq!(creds, MailCredentials::new("bot@corp.com", "hunter2"));
    }

    #[tokio::test]
    async fn test_resolve_missing_secret() {
        let dir = tempfile::tempdir().unwrap();
        let config = SecretsConfig {
            backend: SecretBackend::Vault,
            vault_path: dir.path().join("absent.json").to_string_lossy().to_string(),
            ..Default::default()
        };
        let provider = build_provider(&config).unwrap();
        let err = resolve_credentials(provider.as_ref(), "emailCredentials")
            .await
            .unwrap_err();
        assert!(matches!(err, ReminderError::SecretNotFound(_)));
    }

    #[test]
    fn test_build_env_provider() {
        let provider = build_provider(&SecretsConfig::default()).unwrap();
        assert_eq!(provider.provider_type(), "env");
    }
}
