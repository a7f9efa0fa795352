//! Seams between the job and its collaborators.

pub mod mail;
pub mod secrets;

pub use mail::{MailRelay, MailTransport, Notifier};
pub use secrets::SecretProvider;
