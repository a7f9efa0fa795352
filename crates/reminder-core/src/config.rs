//! Training reminder configuration system.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ReminderError, Result};
use crate::types::EMAIL_CREDENTIALS_KEY;

/// Env var overriding the employee roster path.
pub const EMPLOYEES_PATH_ENV: &str = "EMPLOYEES_EXCEL_PATH";
/// Env var overriding the training records path.
pub const TRAININGS_PATH_ENV: &str = "TRAININGS_EXCEL_PATH";

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default)]
    pub employees_path: String,
    #[serde(default)]
    pub trainings_path: String,
    /// Where to write the JSON run report. Empty disables the report file.
    #[serde(default)]
    pub report_path: String,
    #[serde(default)]
    pub on_failure: FailurePolicy,
    #[serde(default)]
    pub smtp: SmtpConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default)]
    pub reminder: ReminderTemplateConfig,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            employees_path: String::new(),
            trainings_path: String::new(),
            report_path: String::new(),
            on_failure: FailurePolicy::default(),
            smtp: SmtpConfig::default(),
            secrets: SecretsConfig::default(),
            reminder: ReminderTemplateConfig::default(),
        }
    }
}

impl ReminderConfig {
    /// Load config from the default path (~/.training-reminder/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReminderError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ReminderError::Config(format!("Failed to parse config: {e}")))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply `EMPLOYEES_EXCEL_PATH` / `TRAININGS_EXCEL_PATH` overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup (env in production, a map in tests).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(EMPLOYEES_PATH_ENV).filter(|p| !p.is_empty()) {
            self.employees_path = path;
        }
        if let Some(path) = lookup(TRAININGS_PATH_ENV).filter(|p| !p.is_empty()) {
            self.trainings_path = path;
        }
    }

    /// Check that everything a run needs is present.
    pub fn validate(&self) -> Result<()> {
        if self.employees_path.trim().is_empty() {
            return Err(ReminderError::Config(format!(
                "No employee roster configured (set {EMPLOYEES_PATH_ENV})"
            )));
        }
        if self.trainings_path.trim().is_empty() {
            return Err(ReminderError::Config(format!(
                "No training records configured (set {TRAININGS_PATH_ENV})"
            )));
        }
        if self.smtp.host.is_empty() {
            return Err(ReminderError::Config("smtp.host is empty".into()));
        }
        if self.secrets.backend == SecretBackend::Remote && self.secrets.remote_url.is_empty() {
            return Err(ReminderError::Config(
                "secrets.backend = \"remote\" requires secrets.remote_url".into(),
            ));
        }
        Ok(())
    }

    /// Tilde-expanded roster path.
    pub fn employees_file(&self) -> PathBuf {
        expand_path(&self.employees_path)
    }

    /// Tilde-expanded training records path.
    pub fn trainings_file(&self) -> PathBuf {
        expand_path(&self.trainings_path)
    }

    /// Tilde-expanded report path, if configured.
    pub fn report_file(&self) -> Option<PathBuf> {
        if self.report_path.is_empty() {
            None
        } else {
            Some(expand_path(&self.report_path))
        }
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the training reminder home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".training-reminder")
    }
}

/// Expand a leading `~` in a configured path.
pub fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

/// What to do when a reminder cannot be delivered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure, record it, and move on to the next employee.
    #[default]
    Continue,
    /// Stop the run at the first failure.
    Abort,
}

/// SMTP relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub tls: TlsMode,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".into()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            tls: TlsMode::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// How the SMTP connection is protected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain connect, then upgrade with STARTTLS (submission port 587).
    #[default]
    Starttls,
    /// TLS from the first byte (port 465).
    Tls,
    /// No encryption. Only for local test relays.
    None,
}

/// Which secret backend resolves the mail credentials.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SecretBackend {
    #[default]
    Env,
    Vault,
    Remote,
}

/// Secrets configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    #[serde(default)]
    pub backend: SecretBackend,
    #[serde(default = "default_credentials_key")]
    pub credentials_key: String,
    #[serde(default = "default_vault_path")]
    pub vault_path: String,
    /// Whether the local vault file is AES-encrypted at rest.
    #[serde(default)]
    pub encrypt: bool,
    #[serde(default)]
    pub remote_url: String,
    #[serde(default = "default_remote_token_env")]
    pub remote_token_env: String,
    /// Logical secret name → environment variable name.
    #[serde(default)]
    pub env_mappings: HashMap<String, String>,
}

fn default_credentials_key() -> String {
    EMAIL_CREDENTIALS_KEY.into()
}

fn default_vault_path() -> String {
    "~/.training-reminder/vault.json".into()
}

fn default_remote_token_env() -> String {
    "SECRET_SERVICE_TOKEN".into()
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            backend: SecretBackend::default(),
            credentials_key: default_credentials_key(),
            vault_path: default_vault_path(),
            encrypt: false,
            remote_url: String::new(),
            remote_token_env: default_remote_token_env(),
            env_mappings: HashMap::new(),
        }
    }
}

/// Reminder message settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderTemplateConfig {
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Display name on the From header. Empty uses the bare account address.
    #[serde(default)]
    pub sender_name: String,
}

fn default_subject() -> String {
    "Remember to complete your training!".into()
}

impl Default for ReminderTemplateConfig {
    fn default() -> Self {
        Self {
            subject: default_subject(),
            sender_name: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_paths() -> ReminderConfig {
        ReminderConfig {
            employees_path: "employees.xlsx".into(),
            trainings_path: "trainings.xlsx".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = ReminderConfig::default();
        assert_eq!(config.smtp.host, "smtp.gmail.com");
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.smtp.tls, TlsMode::Starttls);
        assert_eq!(config.secrets.backend, SecretBackend::Env);
        assert_eq!(config.secrets.credentials_key, "emailCredentials");
        assert_eq!(config.reminder.subject, "Remember to complete your training!");
        assert_eq!(config.on_failure, FailurePolicy::Continue);
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            employees_path = "/data/employees.xlsx"
            trainings_path = "/data/trainings.csv"
            on_failure = "abort"

            [smtp]
            host = "mail.corp.local"
            port = 465
            tls = "tls"

            [secrets]
            backend = "vault"
            encrypt = true

            [secrets.env_mappings]
            emailCredentials = "CORP_MAIL"
        "#;

        let config: ReminderConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.employees_path, "/data/employees.xlsx");
        assert_eq!(config.on_failure, FailurePolicy::Abort);
        assert_eq!(config.smtp.port, 465);
        assert_eq!(config.smtp.tls, TlsMode::Tls);
        assert_eq!(config.smtp.timeout_secs, 30);
        assert_eq!(config.secrets.backend, SecretBackend::Vault);
        assert!(config.secrets.encrypt);
        assert_eq!(
            config.secrets.env_mappings.get("emailCredentials").map(String::as_str),
            Some("CORP_MAIL")
        );
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let config: ReminderConfig = toml::from_str("").unwrap();
        assert!(config.employees_path.is_empty());
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.secrets.remote_token_env, "SECRET_SERVICE_TOKEN");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "report_path = \"/tmp/report.json\"\n").unwrap();
        let config = ReminderConfig::load_from(&path).unwrap();
        assert_eq!(config.report_file(), Some(PathBuf::from("/tmp/report.json")));
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "on_failure = \"sometimes\"\n").unwrap();
        let err = ReminderConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ReminderError::Config(_)));
    }

    #[test]
    fn test_overrides_replace_paths() {
        let mut config = with_paths();
        config.apply_overrides(|key| match key {
            EMPLOYEES_PATH_ENV => Some("/env/employees.xlsx".into()),
            TRAININGS_PATH_ENV => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.employees_path, "/env/employees.xlsx");
        // Empty override leaves the configured value alone.
        assert_eq!(config.trainings_path, "trainings.xlsx");
    }

    #[test]
    fn test_validate_requires_paths() {
        let err = ReminderConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains(EMPLOYEES_PATH_ENV));

        let config = ReminderConfig {
            employees_path: "employees.xlsx".into(),
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains(TRAININGS_PATH_ENV));

        assert!(with_paths().validate().is_ok());
    }

    #[test]
    fn test_validate_remote_needs_url() {
        let mut config = with_paths();
        config.secrets.backend = SecretBackend::Remote;
        assert!(config.validate().is_err());
        config.secrets.remote_url = "https://vault.corp.local/secrets".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_report_file_disabled_by_default() {
        assert!(ReminderConfig::default().report_file().is_none());
    }

    #[test]
    fn test_home_dir() {
        let home = ReminderConfig::home_dir();
        assert!(home.to_string_lossy().contains("training-reminder"));
    }
}
