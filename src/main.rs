//! # Training Reminder
//!
//! Reads the employee roster and the training completion records, works out
//! which active employees still have trainings to complete, and emails each
//! of them a reminder. One pass, then exit.
//!
//! Usage:
//!   training-reminder                               # Run the job once
//!   training-reminder --dry-run                     # Log reminders, send nothing
//!   training-reminder --config ./reminder.toml      # Custom config file
//!   training-reminder store-secret emailCredentials username=bot@corp.com password=-

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reminder_channels::{Emailer, SmtpRelay};
use reminder_core::config::expand_path;
use reminder_core::traits::{MailRelay, Notifier};
use reminder_core::ReminderConfig;
use reminder_dispatch::DisabledNotifier;
use reminder_security::SecretStore;
use std::io::BufRead;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_TARGETS: &[&str] = &[
    "training_reminder",
    "reminder_core",
    "reminder_tables",
    "reminder_reconcile",
    "reminder_security",
    "reminder_channels",
    "reminder_dispatch",
];

#[derive(Parser)]
#[command(
    name = "training-reminder",
    version,
    about = "📚 Training Reminder — emails employees about trainings they have not completed"
)]
struct Cli {
    /// Config file (default: ~/.training-reminder/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Compute and log reminders without sending any email
    #[arg(long)]
    dry_run: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Write a secret into the local vault
    StoreSecret {
        /// Logical secret name, e.g. emailCredentials
        name: String,
        /// Fields as key=value; a value of "-" is read from stdin
        #[arg(required = true)]
        fields: Vec<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => ReminderConfig::load_from(path)?,
        None => ReminderConfig::load()?,
    };

    if let Some(Command::StoreSecret { name, fields }) = &cli.command {
        return store_secret(&config, name, fields);
    }

    config.apply_env();
    config.validate()?;

    // Mail credentials are resolved once, up front; a dry run needs none.
    let notifier: Box<dyn Notifier> = if cli.dry_run {
        tracing::info!("📝 Dry run — no email will be sent");
        Box::new(DisabledNotifier)
    } else {
        let provider = reminder_security::build_provider(&config.secrets)?;
        let credentials = reminder_security::resolve_credentials(
            provider.as_ref(),
            &config.secrets.credentials_key,
        )
        .await?;
        let relay = SmtpRelay::from_config(&config.smtp);
        tracing::info!("📮 Mail relay: {}", relay.describe());
        Box::new(
            Emailer::new(Box::new(relay), credentials)
                .with_sender_name(&config.reminder.sender_name),
        )
    };

    let report =
        reminder_dispatch::send_training_reminders(&config, notifier.as_ref(), cli.dry_run).await?;
    tracing::info!("📊 {}", report.summary());

    if let Some(path) = config.report_file() {
        report
            .write_to(&path)
            .with_context(|| format!("writing run report to {}", path.display()))?;
    }

    if !report.is_success() {
        anyhow::bail!(
            "{} reminder(s) could not be delivered{}",
            report.failed.len(),
            if report.aborted { "; run aborted" } else { "" }
        );
    }
    Ok(())
}

/// `store-secret`: add fields to a secret in the local vault.
fn store_secret(config: &ReminderConfig, name: &str, fields: &[String]) -> Result<()> {
    let path = expand_path(&config.secrets.vault_path);
    let mut store = SecretStore::load_from(&path, config.secrets.encrypt)?;

    for field in fields {
        let (key, value) = field
            .split_once('=')
            .with_context(|| format!("expected key=value, got '{field}'"))?;
        let value = if value == "-" {
            eprint!("{key}: ");
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        } else {
            value.to_string()
        };
        store.set(name, key, &value);
    }
    store.save()?;

    println!(
        "🔐 Stored '{name}' ({} field(s)) in {}",
        fields.len(),
        store.path().display()
    );
    Ok(())
}
