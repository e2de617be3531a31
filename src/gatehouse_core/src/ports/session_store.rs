use async_trait::async_trait;
use thiserror::Error;

use crate::domain::session::{SessionData, SessionId};

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("Session not found")]
    SessionNotFound,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl PartialEq for SessionStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::SessionNotFound, Self::SessionNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Port to server-side session storage.
///
/// Implementations must make invalidation visible to every later `get` on
/// the same id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Creates and persists an empty session under a fresh id.
    async fn create(&self) -> Result<SessionData, SessionStoreError>;

    async fn get(&self, id: &SessionId) -> Result<Option<SessionData>, SessionStoreError>;

    /// Overwrites an existing session. Fails with `SessionNotFound` if the
    /// session was never created or has been invalidated.
    async fn save(&self, session: SessionData) -> Result<(), SessionStoreError>;

    /// Removes the session. Invalidating an unknown id is not an error.
    async fn invalidate(&self, id: &SessionId) -> Result<(), SessionStoreError>;
}
