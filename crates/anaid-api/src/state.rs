//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use anaid_chat::ChatRelay;
use anaid_mail::TranscriptMailer;

/// Shared application state.
///
/// Cloned into every handler; services sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ChatRelay>,
    pub mailer: Arc<TranscriptMailer>,
    /// Deployment environment reported by `/health`.
    pub environment: String,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(relay: ChatRelay, mailer: TranscriptMailer, environment: impl Into<String>) -> Self {
        Self {
            relay: Arc::new(relay),
            mailer: Arc::new(mailer),
            environment: environment.into(),
            start_time: Instant::now(),
        }
    }
}
