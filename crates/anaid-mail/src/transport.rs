//! Mail transport seam and its SMTP implementation.

use std::fmt;

use anaid_core::config::MailConfig;
use anaid_core::credentials::Secret;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::envelope::TranscriptEnvelope;
use crate::error::MailError;

/// Delivers a composed envelope, or fails. One attempt per call.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, envelope: &TranscriptEnvelope) -> Result<(), MailError>;
}

/// SMTP delivery over implicit TLS (SMTPS), authenticating as the sender.
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
    port: u16,
}

impl fmt::Debug for SmtpMailTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailTransport")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl SmtpMailTransport {
    /// Build a transport from the `[mail]` config section and the SMTP
    /// password. No connection is made until the first delivery.
    pub fn new(config: &MailConfig, password: Secret) -> Result<Self, MailError> {
        let credentials = Credentials::new(config.sender.clone(), password.expose().to_string());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .timeout(Some(config.timeout()))
            .build();
        Ok(Self {
            transport,
            host: config.smtp_host.clone(),
            port: config.smtp_port,
        })
    }
}

/// Convert an envelope into a plain-text RFC 5322 message.
pub fn build_message(envelope: &TranscriptEnvelope) -> Result<Message, MailError> {
    let from: Mailbox = envelope.from.parse()?;
    let to: Mailbox = envelope.to.parse()?;
    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(envelope.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(envelope.body.clone())?;
    Ok(message)
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn deliver(&self, envelope: &TranscriptEnvelope) -> Result<(), MailError> {
        let message = build_message(envelope)?;
        let response = self.transport.send(message).await?;
        tracing::debug!(
            host = %self.host,
            code = %response.code(),
            "SMTP relay accepted message"
        );
        Ok(())
    }
}
