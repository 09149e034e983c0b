//! Transcript mailer: validates a transcript and hands one envelope to the
//! configured transport.

use std::sync::Arc;

use anaid_core::config::MailConfig;
use chrono::Local;

use crate::envelope::TranscriptEnvelope;
use crate::error::MailError;
use crate::transport::MailTransport;

/// Sends chat transcripts to the company mailbox.
pub struct TranscriptMailer {
    transport: Option<Arc<dyn MailTransport>>,
    sender: String,
    recipient: String,
}

impl TranscriptMailer {
    /// `transport` is `None` when no SMTP password was found; every send
    /// then fails with `NotConfigured`.
    pub fn new(config: &MailConfig, transport: Option<Arc<dyn MailTransport>>) -> Self {
        Self {
            transport,
            sender: config.sender.clone(),
            recipient: config.recipient.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    /// Email `transcript` verbatim. Exactly one delivery attempt is made per
    /// call; repeated calls send repeated emails.
    pub async fn send_summary(&self, transcript: &str) -> Result<(), MailError> {
        if transcript.trim().is_empty() {
            return Err(MailError::EmptyTranscript);
        }
        let transport = self.transport.as_ref().ok_or(MailError::NotConfigured)?;

        let envelope =
            TranscriptEnvelope::compose(&self.sender, &self.recipient, transcript, Local::now());

        match transport.deliver(&envelope).await {
            Ok(()) => {
                tracing::info!(
                    to = %self.recipient,
                    chars = transcript.chars().count(),
                    "Transcript emailed"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(to = %self.recipient, error = %e, "Transcript delivery failed");
                Err(e)
            }
        }
    }
}
