//! Mail transport traits.

use async_trait::async_trait;

use crate::error::Result;

/// One authenticated conversation with a mail relay.
#[async_trait]
pub trait MailTransport: Send {
    /// Log in to the relay. Fails with `ReminderError::Authentication`.
    async fn authorize(&mut self, account: &str, password: &str) -> Result<()>;

    /// Transmit one message and end the conversation. Fails with
    /// `ReminderError::Delivery`.
    async fn send_message(
        &mut self,
        sender: &str,
        recipients: &[&str],
        subject: &str,
        body: &str,
    ) -> Result<()>;
}

/// A configured relay that hands out fresh transports.
pub trait MailRelay: Send + Sync {
    fn open(&self) -> Result<Box<dyn MailTransport>>;

    /// Relay address for logging.
    fn describe(&self) -> String;
}

/// Anything that can deliver a reminder to a recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_email(&self, recipient: &str, subject: &str, body: &str) -> Result<()>;
}
