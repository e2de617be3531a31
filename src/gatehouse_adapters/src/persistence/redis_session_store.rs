use std::sync::Arc;

use gatehouse_core::{SessionData, SessionId, SessionStore, SessionStoreError};
use redis::{Commands, Connection};
use tokio::sync::RwLock;

/// Sessions serialized as JSON under `session:<id>`, expiring after
/// `session_ttl` seconds. Every save refreshes the expiry.
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: Arc<RwLock<Connection>>,
    session_ttl: u64,
}

impl RedisSessionStore {
    pub fn new(conn: Arc<RwLock<Connection>>, session_ttl: u64) -> Self {
        Self { conn, session_ttl }
    }

    async fn write(&self, session: &SessionData) -> Result<(), SessionStoreError> {
        let value = serde_json::to_string(session)
            .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))?;
        let mut conn = self.conn.write().await;
        conn.set_ex(get_key(&session.id()), value, self.session_ttl)
            .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisSessionStore {
    #[tracing::instrument(name = "Creating session in Redis", skip_all)]
    async fn create(&self) -> Result<SessionData, SessionStoreError> {
        let session = SessionData::new(SessionId::new());
        self.write(&session).await?;
        Ok(session)
    }

    #[tracing::instrument(name = "Reading session from Redis", skip_all)]
    async fn get(&self, id: &SessionId) -> Result<Option<SessionData>, SessionStoreError> {
        let mut conn = self.conn.write().await;
        let value: Option<String> = conn
            .get(get_key(id))
            .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))?;
        drop(conn);

        value
            .map(|v| serde_json::from_str(&v))
            .transpose()
            .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))
    }

    #[tracing::instrument(name = "Saving session to Redis", skip_all)]
    async fn save(&self, session: SessionData) -> Result<(), SessionStoreError> {
        let exists: bool = {
            let mut conn = self.conn.write().await;
            conn.exists(get_key(&session.id()))
                .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))?
        };
        if !exists {
            return Err(SessionStoreError::SessionNotFound);
        }
        self.write(&session).await
    }

    #[tracing::instrument(name = "Invalidating session in Redis", skip_all)]
    async fn invalidate(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        let mut conn = self.conn.write().await;
        conn.del(get_key(id))
            .map_err(|e| SessionStoreError::UnexpectedError(e.to_string()))
    }
}

const SESSION_KEY_PREFIX: &str = "session:";

fn get_key(id: &SessionId) -> String {
    format!("{}{}", SESSION_KEY_PREFIX, id)
}
