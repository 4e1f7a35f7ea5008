use crate::session::state::{SessionId, SessionRecord, now_millis};
use async_trait::async_trait;
use dashmap::DashMap;
use metrics::counter;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Session store errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session has expired: {0}")]
    Expired(SessionId),

    #[error("Session store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed storage for session records.
///
/// Lookups of a record idle for longer than the store's TTL report
/// [`SessionError::Expired`] once and forget the record.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the record for a session, if one exists
    async fn get(&self, id: &str) -> Result<Option<SessionRecord>, SessionError>;

    /// Insert or replace the record for a session
    async fn set(&self, id: &str, record: SessionRecord) -> Result<(), SessionError>;

    /// Forget a session entirely
    async fn clear(&self, id: &str) -> Result<(), SessionError>;

    /// Drop every expired session, returning how many were removed
    async fn cleanup_expired(&self) -> usize;

    /// Number of sessions currently held
    async fn session_count(&self) -> usize;
}

struct StoredSession {
    record: SessionRecord,
    last_seen_at: u64,
}

/// In-process session store backed by a sharded concurrent map
pub struct MemorySessionStore {
    sessions: DashMap<SessionId, StoredSession>,
    ttl: Duration,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }

    fn is_expired(&self, session: &StoredSession, now: u64) -> bool {
        now.saturating_sub(session.last_seen_at) > self.ttl.as_millis() as u64
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(crate::config::SessionConfig::default().ttl)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, id: &str) -> Result<Option<SessionRecord>, SessionError> {
        let now = now_millis();

        // The shard guard must be released before removing the entry
        match self.sessions.get_mut(id) {
            None => return Ok(None),
            Some(mut entry) if !self.is_expired(&entry, now) => {
                entry.last_seen_at = now;
                return Ok(Some(entry.record.clone()));
            }
            Some(_) => {}
        }

        self.sessions.remove(id);
        counter!("detour_sessions_expired_total").increment(1);
        info!("Session {} expired", id);
        Err(SessionError::Expired(id.to_string()))
    }

    async fn set(&self, id: &str, record: SessionRecord) -> Result<(), SessionError> {
        let stored = StoredSession {
            record,
            last_seen_at: now_millis(),
        };
        if self.sessions.insert(id.to_string(), stored).is_none() {
            counter!("detour_sessions_created_total").increment(1);
            debug!("Created session {}", id);
        }
        Ok(())
    }

    async fn clear(&self, id: &str) -> Result<(), SessionError> {
        self.sessions.remove(id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> usize {
        let now = now_millis();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !self.is_expired(session, now));
        let removed = before.saturating_sub(self.sessions.len());

        if removed > 0 {
            info!("Removed {} expired sessions", removed);
            counter!("detour_sessions_expired_total").increment(removed as u64);
        }
        removed
    }

    async fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
