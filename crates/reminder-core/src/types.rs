//! Secret and credential types shared by the secret backends and the mailer.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::error::{ReminderError, Result};

/// Logical name of the secret holding the mail account.
pub const EMAIL_CREDENTIALS_KEY: &str = "emailCredentials";

/// A resolved secret: a named bag of string fields.
#[derive(Clone)]
pub struct SecretValue {
    /// Logical secret name (e.g. "emailCredentials").
    pub name: String,
    /// Field name → value.
    pub values: BTreeMap<String, String>,
    /// When this value was fetched from its backend.
    pub loaded_at: DateTime<Utc>,
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretValue")
            .field("name", &self.name)
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

impl SecretValue {
    pub fn new(name: impl Into<String>, values: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            values,
            loaded_at: Utc::now(),
        }
    }

    /// Parse a JSON object of string fields.
    ///
    /// Accepts either `{"username": "..", ...}` or the same object wrapped
    /// as `{"values": {...}}`. Non-string scalars are stringified.
    pub fn from_json(name: &str, json: &serde_json::Value) -> Result<Self> {
        let object = match json.get("values") {
            Some(inner @ serde_json::Value::Object(_)) => inner,
            _ => json,
        };
        let map = object.as_object().ok_or_else(|| {
            ReminderError::Secret(format!("Secret '{name}' is not a JSON object"))
        })?;

        let mut values = BTreeMap::new();
        for (key, value) in map {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => continue,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(ReminderError::Secret(format!(
                        "Secret '{name}' field '{key}' is not a scalar"
                    )));
                }
                other => other.to_string(),
            };
            values.insert(key.clone(), text);
        }
        Ok(Self::new(name, values))
    }

    /// Get a field, failing with a descriptive error if absent or empty.
    pub fn require(&self, field: &str) -> Result<&str> {
        match self.values.get(field) {
            Some(v) if !v.is_empty() => Ok(v.as_str()),
            _ => Err(ReminderError::Secret(format!(
                "Secret '{}' has no '{field}' field",
                self.name
            ))),
        }
    }
}

/// Mail account credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct MailCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for MailCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl MailCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Extract `{username, password}` from a resolved secret.
    pub fn from_secret(secret: &SecretValue) -> Result<Self> {
        Ok(Self::new(
            secret.require("username")?,
            secret.require("password")?,
        ))
    }
}
