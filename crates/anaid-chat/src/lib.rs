//! Conversation relay for the Anaid support assistant.
//!
//! Holds per-session conversation history, seeds each session with the
//! company persona, and forwards the full history to the completion model
//! on every message.

pub mod completion;
pub mod error;
pub mod gemini;
pub mod locks;
pub mod persona;
pub mod relay;
pub mod store;

pub use completion::CompletionModel;
pub use error::ChatError;
pub use gemini::GeminiClient;
pub use locks::SessionLocks;
pub use relay::{resolve_session_key, ChatRelay, DEFAULT_SESSION_KEY};
pub use store::{InMemorySessionStore, SessionStore};
