//! Environment variable secret provider.
//!
//! The variable holds the secret as a JSON object, e.g.
//! `EMAIL_CREDENTIALS='{"username":"bot@corp.com","password":"..."}'`.

use async_trait::async_trait;
use reminder_core::error::{ReminderError, Result};
use reminder_core::traits::SecretProvider;
use reminder_core::types::SecretValue;
use std::collections::HashMap;

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads secrets from environment variables.
///
/// Logical names map to variable names through `mappings`, or by converting
/// camelCase to SCREAMING_SNAKE_CASE (`emailCredentials` → `EMAIL_CREDENTIALS`).
pub struct EnvSecretProvider {
    mappings: HashMap<String, String>,
    lookup: Lookup,
}

impl EnvSecretProvider {
    pub fn new(mappings: HashMap<String, String>) -> Self {
        Self::with_lookup(mappings, Box::new(|key| std::env::var(key).ok()))
    }

    /// Use a custom variable lookup instead of the process environment.
    pub fn with_lookup(mappings: HashMap<String, String>, lookup: Lookup) -> Self {
        Self { mappings, lookup }
    }

    fn resolve_env_var_name(&self, logical_name: &str) -> String {
        match self.mappings.get(logical_name) {
            Some(mapped) => mapped.clone(),
            None => screaming_snake(logical_name),
        }
    }
}

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    async fn get_secret(&self, name: &str) -> Result<SecretValue> {
        let env_var = self.resolve_env_var_name(name);
        let raw = (self.lookup)(&env_var)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ReminderError::SecretNotFound(name.to_string()))?;

        let json: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
            ReminderError::Secret(format!("{env_var} does not hold a JSON object: {e}"))
        })?;
        tracing::debug!(
            secret_name = name,
            env_var = %env_var,
            "Secret loaded from environment variable"
        );
        SecretValue::from_json(name, &json)
    }

    fn provider_type(&self) -> &'static str {
        "env"
    }
}

fn screaming_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        if ch == '-' || ch == '.' || ch == ' ' {
            out.push('_');
        } else {
            out.push(ch.to_ascii_uppercase());
        }
    }
    out
}
