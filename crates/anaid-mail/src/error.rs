//! Error types for transcript delivery.

/// Errors from composing or delivering a transcript email.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport is not configured")]
    NotConfigured,
    #[error("transcript cannot be empty")]
    EmptyTranscript,
    #[error("invalid mail address: {0}")]
    Address(String),
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl From<lettre::address::AddressError> for MailError {
    fn from(err: lettre::address::AddressError) -> Self {
        MailError::Address(err.to_string())
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        MailError::Delivery(format!("could not build message: {}", err))
    }
}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        if err.is_timeout() {
            MailError::Delivery(format!("SMTP timed out: {}", err))
        } else {
            MailError::Delivery(err.to_string())
        }
    }
}
