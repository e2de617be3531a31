use std::sync::Arc;

use async_trait::async_trait;
use gatehouse_core::{LogoutHandler, LogoutHandlerError, Principal, RequestContext, SessionStore};

/// Default logout handler.
///
/// With invalidation enabled the request's session is removed from the store
/// and its id dropped from the context, so the old id resolves to nothing on
/// the next request. With invalidation disabled the session is left alone;
/// the sequencer still clears the security identity afterwards.
#[derive(Clone)]
pub struct SecurityContextLogoutHandler {
    session_store: Option<Arc<dyn SessionStore>>,
    invalidate_session: bool,
}

impl SecurityContextLogoutHandler {
    pub fn new(session_store: Option<Arc<dyn SessionStore>>) -> Self {
        Self {
            session_store,
            invalidate_session: true,
        }
    }

    pub fn with_invalidate_session(mut self, invalidate_session: bool) -> Self {
        self.invalidate_session = invalidate_session;
        self
    }

    pub fn invalidates_session(&self) -> bool {
        self.invalidate_session
    }
}

#[async_trait]
impl LogoutHandler for SecurityContextLogoutHandler {
    fn name(&self) -> &str {
        "security-context"
    }

    async fn cleanup(
        &self,
        ctx: &mut RequestContext,
        _principal: Option<&Principal>,
    ) -> Result<(), LogoutHandlerError> {
        if !self.invalidate_session {
            return Ok(());
        }
        let Some(store) = &self.session_store else {
            return Ok(());
        };
        if let Some(session_id) = ctx.clear_session_id() {
            store.invalidate(&session_id).await?;
            tracing::debug!(%session_id, "Invalidated session");
        }
        Ok(())
    }
}
