use std::sync::Arc;

use async_trait::async_trait;
use gatehouse_core::{
    Principal, RequestContext, SessionAuthenticationError, SessionAuthenticationStrategy,
    SessionData, SessionStore, SessionStoreError,
};

/// Moves the request onto a freshly issued session after every successful
/// login, so an id planted before authentication never becomes an
/// authenticated one.
///
/// Whatever the old session persisted is carried over; the old id is
/// invalidated. Ids the store does not know are left untouched.
#[derive(Clone)]
pub struct ChangeSessionIdStrategy {
    session_store: Arc<dyn SessionStore>,
}

impl ChangeSessionIdStrategy {
    pub fn new(session_store: Arc<dyn SessionStore>) -> Self {
        Self { session_store }
    }

    async fn move_session(
        &self,
        old: &SessionData,
        mut fresh: SessionData,
    ) -> Result<(), SessionStoreError> {
        if let Some(persisted) = old.principal() {
            fresh.set_principal(persisted.clone());
            self.session_store.save(fresh).await?;
        }
        self.session_store.invalidate(&old.id()).await
    }
}

#[async_trait]
impl SessionAuthenticationStrategy for ChangeSessionIdStrategy {
    #[tracing::instrument(name = "ChangeSessionIdStrategy::on_authentication", skip_all)]
    async fn on_authentication(
        &self,
        ctx: &mut RequestContext,
        _principal: &Principal,
    ) -> Result<(), SessionAuthenticationError> {
        let Some(old_id) = ctx.session_id() else {
            return Ok(());
        };

        let Some(old) = self.session_store.get(&old_id).await? else {
            tracing::debug!(session_id = %old_id, "Not rotating a session the store does not know");
            return Ok(());
        };

        let fresh = self.session_store.create().await?;
        let fresh_id = fresh.id();
        if let Err(error) = self.move_session(&old, fresh).await {
            if let Err(cleanup) = self.session_store.invalidate(&fresh_id).await {
                tracing::warn!(
                    session_id = %fresh_id,
                    error = %cleanup,
                    "Failed to discard rotated session"
                );
            }
            return Err(error.into());
        }
        ctx.set_session_id(fresh_id);

        tracing::debug!(old = %old_id, new = %fresh_id, "Rotated session id");
        Ok(())
    }
}
