//! Email delivery over SMTP (async lettre).
//!
//! Every `send_email` call opens one SMTP connection, authenticates once,
//! sends exactly one message and quits. Nothing is pooled across calls.

use async_trait::async_trait;
use lettre::transport::smtp::Error as SmtpError;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{AsyncSmtpConnection, TlsParameters};
use lettre::transport::smtp::extension::ClientId;
use lettre::{Message as LettreMessage, message::Mailbox, message::header::ContentType};
use reminder_core::config::{SmtpConfig, TlsMode};
use reminder_core::error::{ReminderError, Result};
use reminder_core::traits::{MailRelay, MailTransport, Notifier};
use reminder_core::types::MailCredentials;
use std::time::Duration;

const AUTH_MECHANISMS: &[Mechanism] = &[Mechanism::Plain, Mechanism::Login];

/// Fixed SMTP relay taken from deployment configuration.
#[derive(Debug, Clone)]
pub struct SmtpRelay {
    host: String,
    port: u16,
    tls: TlsMode,
    timeout: Duration,
}

impl SmtpRelay {
    pub fn new(host: &str, port: u16, tls: TlsMode, timeout: Duration) -> Self {
        Self {
            host: host.to_string(),
            port,
            tls,
            timeout,
        }
    }

    pub fn from_config(config: &SmtpConfig) -> Self {
        if config.tls == TlsMode::None {
            tracing::warn!(
                "⚠️  SMTP relay {}:{} configured without TLS — credentials travel in clear text",
                config.host,
                config.port
            );
        }
        Self::new(
            &config.host,
            config.port,
            config.tls,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn tls_parameters(&self) -> Result<TlsParameters> {
        TlsParameters::new(self.host.clone())
            .map_err(|e| ReminderError::Config(format!("SMTP TLS for {}: {e}", self.host)))
    }

    /// Open a session, upgrading it with STARTTLS when configured.
    async fn connect(&self) -> Result<AsyncSmtpConnection> {
        let hello = ClientId::default();
        let implicit_tls = match self.tls {
            TlsMode::Tls => Some(self.tls_parameters()?),
            TlsMode::Starttls | TlsMode::None => None,
        };

        let mut conn = AsyncSmtpConnection::connect_tokio1(
            (self.host.as_str(), self.port),
            Some(self.timeout),
            &hello,
            implicit_tls,
            None,
        )
        .await
        .map_err(|e| ReminderError::Delivery(format!("connect {}: {e}", self.describe())))?;

        if self.tls == TlsMode::Starttls {
            if !conn.can_starttls() {
                conn.abort().await;
                return Err(ReminderError::Delivery(format!(
                    "{} does not offer STARTTLS",
                    self.describe()
                )));
            }
            conn.starttls(self.tls_parameters()?, &hello)
                .await
                .map_err(|e| {
                    ReminderError::Delivery(format!("STARTTLS {}: {e}", self.describe()))
                })?;
        }
        Ok(conn)
    }
}

impl MailRelay for SmtpRelay {
    fn open(&self) -> Result<Box<dyn MailTransport>> {
        Ok(Box::new(SmtpMailTransport::new(self.clone())))
    }

    fn describe(&self) -> String {
        let tls = match self.tls {
            TlsMode::Starttls => "starttls",
            TlsMode::Tls => "tls",
            TlsMode::None => "plaintext",
        };
        format!("{}:{} ({tls})", self.host, self.port)
    }
}

/// One SMTP conversation. `authorize` must succeed before `send_message`,
/// and the session is closed once the message is sent.
pub struct SmtpMailTransport {
    relay: SmtpRelay,
    connection: Option<AsyncSmtpConnection>,
}

impl SmtpMailTransport {
    pub fn new(relay: SmtpRelay) -> Self {
        Self {
            relay,
            connection: None,
        }
    }
}

/// 534/535 are the relay refusing the login; anything else is a transport failure.
fn auth_error(account: &str, relay: &str, e: SmtpError) -> ReminderError {
    match e.status().map(u16::from) {
        Some(534 | 535) => ReminderError::Authentication(format!("{account}: {e}")),
        _ => ReminderError::Delivery(format!("AUTH at {relay}: {e}")),
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn authorize(&mut self, account: &str, password: &str) -> Result<()> {
        let mut conn = self.relay.connect().await?;
        let creds = Credentials::new(account.to_string(), password.to_string());

        if let Err(e) = conn.auth(AUTH_MECHANISMS, &creds).await {
            conn.abort().await;
            return Err(auth_error(account, &self.relay.describe(), e));
        }

        tracing::debug!("🔑 Authenticated to {} as {account}", self.relay.describe());
        self.connection = Some(conn);
        Ok(())
    }

    async fn send_message(
        &mut self,
        sender: &str,
        recipients: &[&str],
        subject: &str,
        body: &str,
    ) -> Result<()> {
        let mut conn = self
            .connection
            .take()
            .ok_or_else(|| ReminderError::Authentication("transport not authorized".into()))?;

        let email = match build_message(sender, recipients, subject, body) {
            Ok(email) => email,
            Err(e) => {
                conn.abort().await;
                return Err(e);
            }
        };

        if let Err(e) = conn.send(email.envelope(), &email.formatted()).await {
            conn.abort().await;
            return Err(ReminderError::Delivery(format!("SMTP send: {e}")));
        }
        if let Err(e) = conn.quit().await {
            tracing::debug!("QUIT after delivery failed: {e}");
        }
        Ok(())
    }
}

fn build_message(
    sender: &str,
    recipients: &[&str],
    subject: &str,
    body: &str,
) -> Result<LettreMessage> {
    let from_mailbox: Mailbox = sender
        .parse()
        .map_err(|e| ReminderError::InvalidAddress(format!("from '{sender}': {e}")))?;

    if recipients.is_empty() {
        return Err(ReminderError::InvalidAddress("no recipients".into()));
    }

    let mut builder = LettreMessage::builder()
        .from(from_mailbox)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN);

    for to in recipients {
        let to_mailbox: Mailbox = to
            .parse()
            .map_err(|e| ReminderError::InvalidAddress(format!("to '{to}': {e}")))?;
        builder = builder.to(to_mailbox);
    }

    builder
        .body(body.to_string())
        .map_err(|e| ReminderError::Delivery(format!("Build email: {e}")))
}

/// Sends reminders through a relay with pre-resolved credentials.
pub struct Emailer {
    relay: Box<dyn MailRelay>,
    credentials: MailCredentials,
    sender_name: Option<String>,
}

impl Emailer {
    pub fn new(relay: Box<dyn MailRelay>, credentials: MailCredentials) -> Self {
        Self {
            relay,
            credentials,
            sender_name: None,
        }
    }

    /// Display name for the From header; empty strings are ignored.
    pub fn with_sender_name(mut self, name: &str) -> Self {
        let name = name.trim();
        self.sender_name = (!name.is_empty()).then(|| name.to_string());
        self
    }

    /// From header value: the account, optionally with a display name.
    pub fn sender(&self) -> String {
        match &self.sender_name {
            Some(name) => format!("{name} <{}>", self.credentials.username),
            None => self.credentials.username.clone(),
        }
    }
}

#[async_trait]
impl Notifier for Emailer {
    async fn send_email(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let recipient = recipient.trim();
        if recipient.is_empty() {
            return Err(ReminderError::InvalidAddress("empty recipient".into()));
        }

        let mut transport = self.relay.open()?;
        transport
            .authorize(&self.credentials.username, &self.credentials.password)
            .await?;
        transport
            .send_message(&self.sender(), &[recipient], subject, body)
            .await?;

        tracing::info!("📤 Email sent to: {recipient}");
        Ok(())
    }
}
