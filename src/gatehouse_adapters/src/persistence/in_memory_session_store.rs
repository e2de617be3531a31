use std::{sync::Arc, time::Duration};

use dashmap::DashMap;
use gatehouse_core::{SessionData, SessionId, SessionStore, SessionStoreError};
use tokio::time::Instant;

struct StoredSession {
    data: SessionData,
    expires_at: Instant,
}

/// Session store held in process memory.
///
/// Sessions expire `session_ttl` seconds after they were created or last
/// saved. Expired entries read as absent and are dropped on access; `create`
/// also sweeps whatever expired in the meantime.
#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<DashMap<SessionId, StoredSession>>,
    session_ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(session_ttl: u64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            session_ttl: Duration::from_secs(session_ttl),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drops every expired session, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, stored| stored.expires_at > now);
        before.saturating_sub(self.sessions.len())
    }

    fn stored(&self, data: SessionData) -> StoredSession {
        StoredSession {
            data,
            expires_at: Instant::now() + self.session_ttl,
        }
    }
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self) -> Result<SessionData, SessionStoreError> {
        let purged = self.purge_expired();
        if purged > 0 {
            tracing::debug!(purged, "Purged expired sessions");
        }
        let session = SessionData::new(SessionId::new());
        self.sessions.insert(session.id(), self.stored(session.clone()));
        Ok(session)
    }

    async fn get(&self, id: &SessionId) -> Result<Option<SessionData>, SessionStoreError> {
        let now = Instant::now();
        if let Some(stored) = self.sessions.get(id) {
            if stored.expires_at > now {
                return Ok(Some(stored.data.clone()));
            }
        }
        self.sessions.remove_if(id, |_, stored| stored.expires_at <= now);
        Ok(None)
    }

    async fn save(&self, session: SessionData) -> Result<(), SessionStoreError> {
        let now = Instant::now();
        let mut slot = self
            .sessions
            .get_mut(&session.id())
            .filter(|stored| stored.expires_at > now)
            .ok_or(SessionStoreError::SessionNotFound)?;
        *slot = self.stored(session);
        Ok(())
    }

    async fn invalidate(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        self.sessions.remove(id);
        Ok(())
    }
}
