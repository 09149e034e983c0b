//! Session store: conversation history keyed by session key.
//!
//! `SessionStore` is the seam between the relay and wherever histories live.
//! `InMemorySessionStore` keeps them in process memory, bounded by a session
//! count (least recently used key evicted first) and an idle timeout.

use std::collections::HashMap;
use std::time::Duration;

use anaid_core::types::Turn;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::ChatError;
use crate::persona;

/// Storage for per-session conversation histories.
///
/// Implementations must be safe for concurrent callers using different keys.
/// Same-key serialization is the relay's job (see `SessionLocks`).
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Return the history for `key`, creating a session seeded with the
    /// persona turns if none exists.
    async fn get_or_create(&self, key: &str) -> Vec<Turn>;

    /// Append `turns` to an existing session, in order.
    async fn append(&self, key: &str, turns: Vec<Turn>) -> Result<(), ChatError>;

    /// Snapshot of a session's history, if the session is live.
    async fn history(&self, key: &str) -> Option<Vec<Turn>>;

    /// Number of live sessions.
    async fn session_count(&self) -> usize;

    /// Drop expired sessions and return how many were removed.
    async fn purge_expired(&self) -> usize;
}

struct SessionEntry {
    turns: Vec<Turn>,
    last_active: Instant,
}

/// Process-memory session store with LRU eviction and idle expiry.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    max_sessions: usize,
    idle_timeout: Duration,
}

impl InMemorySessionStore {
    /// Create a store holding at most `max_sessions` sessions (minimum 1),
    /// each expiring after `idle_timeout` without activity.
    pub fn new(max_sessions: usize, idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_sessions: max_sessions.max(1),
            idle_timeout,
        }
    }

    fn is_expired(&self, entry: &SessionEntry, now: Instant) -> bool {
        now.duration_since(entry.last_active) > self.idle_timeout
    }

    fn evict_lru(sessions: &mut HashMap<String, SessionEntry>) {
        let oldest = sessions
            .iter()
            .min_by_key(|(_, entry)| entry.last_active)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            sessions.remove(&key);
            tracing::debug!(session = %key, "Evicted least recently used session");
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(10_000, Duration::from_secs(120 * 60))
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create(&self, key: &str) -> Vec<Turn> {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        let expired = sessions
            .get(key)
            .is_some_and(|entry| self.is_expired(entry, now));
        if expired {
            sessions.remove(key);
            tracing::debug!(session = %key, "Session expired, starting over");
        }

        if let Some(entry) = sessions.get_mut(key) {
            entry.last_active = now;
            return entry.turns.clone();
        }

        while sessions.len() >= self.max_sessions {
            Self::evict_lru(&mut sessions);
        }

        let turns = persona::seed_turns();
        sessions.insert(
            key.to_string(),
            SessionEntry {
                turns: turns.clone(),
                last_active: now,
            },
        );
        tracing::info!(session = %key, live = sessions.len(), "Session created");
        turns
    }

    async fn append(&self, key: &str, turns: Vec<Turn>) -> Result<(), ChatError> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions
            .get_mut(key)
            .ok_or_else(|| ChatError::SessionNotFound(key.to_string()))?;
        entry.turns.extend(turns);
        entry.last_active = Instant::now();
        Ok(())
    }

    async fn history(&self, key: &str) -> Option<Vec<Turn>> {
        let now = Instant::now();
        let sessions = self.sessions.lock().await;
        sessions
            .get(key)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| entry.turns.clone())
    }

    async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }

    async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !self.is_expired(entry, now));
        before - sessions.len()
    }
}
