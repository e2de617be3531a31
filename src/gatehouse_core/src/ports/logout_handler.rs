use async_trait::async_trait;
use thiserror::Error;

use super::session_store::SessionStoreError;
use crate::{context::RequestContext, domain::principal::Principal};

#[derive(Debug, Error)]
pub enum LogoutHandlerError {
    #[error("Session store error: {0}")]
    SessionStore(#[from] SessionStoreError),
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

/// One cleanup step run during logout.
///
/// Handlers run in registration order and must tolerate a context that has
/// already been cleaned up (no session, no principal).
#[async_trait]
pub trait LogoutHandler: Send + Sync {
    /// Short name used in logs and failure reports.
    fn name(&self) -> &str;

    async fn cleanup(
        &self,
        ctx: &mut RequestContext,
        principal: Option<&Principal>,
    ) -> Result<(), LogoutHandlerError>;
}
