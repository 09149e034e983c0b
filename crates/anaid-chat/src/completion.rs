//! The completion capability: given an ordered conversation, produce the
//! assistant's next reply.

use anaid_core::types::Turn;
use async_trait::async_trait;

use crate::error::ChatError;

/// A language model that continues a conversation.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Model identifier, for logs and status output.
    fn model_name(&self) -> &str;

    /// Generate the next assistant reply for `context`.
    ///
    /// `context` is the full history in order, ending with the caller turn
    /// being answered. Exactly one upstream request is made per call.
    async fn complete(&self, context: &[Turn]) -> Result<String, ChatError>;
}
