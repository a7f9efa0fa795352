//! # Reminder Channels
//!
//! Mail delivery: an SMTP relay built from configuration, and the emailer
//! that authenticates and sends one message per call.

pub mod email;

pub use email::{Emailer, SmtpMailTransport, SmtpRelay};
