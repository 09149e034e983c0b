//! Chat relay: threads a caller's message through their session history and
//! the completion model.
//!
//! A turn is committed to the session only when the model answered, so the
//! stored history always alternates caller/assistant after the persona seed.

use std::sync::Arc;

use anaid_core::types::Turn;

use crate::completion::CompletionModel;
use crate::error::ChatError;
use crate::locks::SessionLocks;
use crate::store::SessionStore;

/// Session key used when the caller does not supply one.
pub const DEFAULT_SESSION_KEY: &str = "default_guest";

/// Default maximum message length in characters.
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 4000;

/// Resolve the caller-supplied key, falling back to the shared guest session.
pub fn resolve_session_key(requested: Option<&str>) -> &str {
    match requested.map(str::trim) {
        Some(key) if !key.is_empty() => key,
        _ => DEFAULT_SESSION_KEY,
    }
}

/// Relays chat messages to the completion model with per-session context.
pub struct ChatRelay {
    store: Arc<dyn SessionStore>,
    model: Option<Arc<dyn CompletionModel>>,
    locks: SessionLocks,
    max_message_chars: usize,
}

impl ChatRelay {
    /// Create a relay. `model` is `None` when no provider credential was
    /// supplied; every chat call then fails with `NotConfigured`.
    pub fn new(store: Arc<dyn SessionStore>, model: Option<Arc<dyn CompletionModel>>) -> Self {
        Self {
            store,
            model,
            locks: SessionLocks::new(),
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }

    pub fn with_max_message_chars(mut self, max: usize) -> Self {
        self.max_message_chars = max;
        self
    }

    /// Whether a completion model is available.
    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.model_name())
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Send `message` on behalf of `session_key` and return the reply.
    ///
    /// Requests for the same key are serialized. On success the caller turn
    /// and the reply are appended together; on failure the history is left
    /// as it was.
    pub async fn chat(&self, session_key: Option<&str>, message: &str) -> Result<String, ChatError> {
        let model = self.model.as_ref().ok_or(ChatError::NotConfigured)?;

        if message.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        if message.chars().count() > self.max_message_chars {
            return Err(ChatError::MessageTooLong(self.max_message_chars));
        }

        let key = resolve_session_key(session_key);
        let _guard = self.locks.acquire(key).await;

        let mut context = self.store.get_or_create(key).await;
        let caller_turn = Turn::caller(message);
        context.push(caller_turn.clone());

        tracing::info!(
            session = %key,
            turns = context.len(),
            chars = message.chars().count(),
            "Relaying chat message"
        );

        let reply = match model.complete(&context).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(session = %key, model = %model.model_name(), error = %e, "Completion failed");
                return Err(e);
            }
        };

        self.store
            .append(key, vec![caller_turn, Turn::assistant(reply.clone())])
            .await?;

        tracing::debug!(session = %key, reply_chars = reply.chars().count(), "Reply committed");
        Ok(reply)
    }
}
