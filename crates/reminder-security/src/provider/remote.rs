//! Remote secret service provider.
//!
//! `GET {base_url}/{name}` with an optional bearer token. The service answers
//! a JSON object of fields, optionally wrapped as `{"values": {...}}`.

use async_trait::async_trait;
use reminder_core::error::{ReminderError, Result};
use reminder_core::traits::SecretProvider;
use reminder_core::types::SecretValue;
use std::time::Duration;

pub struct RemoteSecretProvider {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for RemoteSecretProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSecretProvider")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl RemoteSecretProvider {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(ReminderError::Config("remote secret service URL is empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReminderError::Secret(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn secret_url(&self, name: &str) -> String {
        format!("{}/{name}", self.base_url)
    }
}

#[async_trait]
impl SecretProvider for RemoteSecretProvider {
    async fn get_secret(&self, name: &str) -> Result<SecretValue> {
        let url = self.secret_url(name);
        let mut req = self.client.get(&url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| ReminderError::Secret(format!("Secret service unreachable: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ReminderError::SecretNotFound(name.to_string()));
        }
        if !status.is_success() {
            return Err(ReminderError::Secret(format!(
                "Secret service returned {status} for '{name}'"
            )));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ReminderError::Secret(format!("Invalid secret payload: {e}")))?;
        tracing::debug!(secret_name = name, "Secret loaded from remote service");
        SecretValue::from_json(name, &json)
    }

    fn provider_type(&self) -> &'static str {
        "remote"
    }
}
