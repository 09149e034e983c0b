//! Transcript delivery for the Anaid support assistant.
//!
//! Wraps a finished chat transcript in a fixed Spanish notice and emails it
//! to the company mailbox over SMTP.

pub mod envelope;
pub mod error;
pub mod mailer;
pub mod transport;

pub use envelope::TranscriptEnvelope;
pub use error::MailError;
pub use mailer::TranscriptMailer;
pub use transport::{MailTransport, SmtpMailTransport};
