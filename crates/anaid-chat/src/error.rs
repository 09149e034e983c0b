//! Error types for the chat relay.

/// Errors from the relay, the session store and the completion provider.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("completion provider is not configured")]
    NotConfigured,
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("upstream error: {0}")]
    Upstream(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Upstream(format!("request timed out: {}", err))
        } else {
            ChatError::Upstream(err.to_string())
        }
    }
}
