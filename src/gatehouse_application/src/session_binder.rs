//! Binding of authenticated identities to requests and sessions.

use std::{
    ops::{Deref, DerefMut},
    sync::Arc,
};

use gatehouse_core::{
    AuthenticationMode, ConfigurationError, Principal, RequestContext, SessionStore,
    SessionStoreError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("Login command is not started")]
    NotStarted,
    #[error("Session store error: {0}")]
    SessionStore(#[from] SessionStoreError),
}

/// Keeps the principal bound to a request in sync with the session store.
///
/// In [`AuthenticationMode::PerSession`] the bound principal is persisted in
/// the session named by the context's session id, creating the session on
/// first bind. In [`AuthenticationMode::PerClient`] nothing is persisted.
#[derive(Clone)]
pub struct SessionBinder {
    mode: AuthenticationMode,
    session_store: Option<Arc<dyn SessionStore>>,
}

impl SessionBinder {
    pub fn new(
        mode: AuthenticationMode,
        session_store: Option<Arc<dyn SessionStore>>,
    ) -> Result<Self, ConfigurationError> {
        if !mode.is_per_client() && session_store.is_none() {
            return Err(ConfigurationError::MissingSessionStore);
        }
        Ok(Self {
            mode,
            session_store,
        })
    }

    pub fn mode(&self) -> AuthenticationMode {
        self.mode
    }

    fn persisting_store(&self) -> Option<&Arc<dyn SessionStore>> {
        match self.mode {
            AuthenticationMode::PerSession => self.session_store.as_ref(),
            AuthenticationMode::PerClient => None,
        }
    }

    /// Loads the principal persisted for the context's session, if any.
    ///
    /// A session id the store no longer knows is dropped from the context so
    /// a fresh session is issued on the next bind.
    #[tracing::instrument(name = "SessionBinder::restore", skip_all, fields(request_id = %ctx.request_id()))]
    pub async fn restore(&self, ctx: &mut RequestContext) -> Result<(), SessionStoreError> {
        let (Some(store), Some(session_id)) = (self.persisting_store(), ctx.session_id()) else {
            return Ok(());
        };

        match store.get(&session_id).await? {
            Some(session) => {
                if let Some(principal) = session.principal() {
                    ctx.bind_principal(principal.clone());
                }
            }
            None => {
                tracing::debug!(%session_id, "Discarding unknown session id");
                ctx.clear_session_id();
            }
        }
        Ok(())
    }

    /// Binds `principal` to the context and, per session, persists it.
    #[tracing::instrument(name = "SessionBinder::bind", skip_all, fields(principal = principal.name()))]
    pub async fn bind(
        &self,
        ctx: &mut RequestContext,
        principal: Principal,
    ) -> Result<(), SessionStoreError> {
        let Some(store) = self.persisting_store() else {
            ctx.bind_principal(principal);
            return Ok(());
        };

        let existing = match ctx.session_id() {
            Some(id) => store.get(&id).await?,
            None => None,
        };
        let mut session = match existing {
            Some(session) => session,
            None => {
                let session = store.create().await?;
                ctx.set_session_id(session.id());
                session
            }
        };

        session.set_principal(principal.clone());
        store.save(session).await?;
        ctx.bind_principal(principal);
        Ok(())
    }

    pub fn current_principal<'a>(&self, ctx: &'a RequestContext) -> Option<&'a Principal> {
        ctx.principal()
    }

    /// Clears the bound principal from the context and from its session.
    ///
    /// The session itself stays valid; invalidating it is a logout
    /// handler's job.
    #[tracing::instrument(name = "SessionBinder::unbind", skip_all, fields(request_id = %ctx.request_id()))]
    pub async fn unbind(
        &self,
        ctx: &mut RequestContext,
    ) -> Result<Option<Principal>, SessionStoreError> {
        let principal = ctx.take_principal();

        if let (Some(store), Some(session_id)) = (self.persisting_store(), ctx.session_id()) {
            if let Some(mut session) = store.get(&session_id).await? {
                if session.clear_principal().is_some() {
                    store.save(session).await?;
                }
            }
        }
        Ok(principal)
    }
}

/// A request context acquired for the duration of one dispatch.
///
/// Whatever happens inside the scope (normal return, early `?` return, or a
/// panic unwinding through it) the bound principal is released when the
/// scope ends. [`RequestScope::finish`] hands the context back, without its
/// principal, so the caller can write response cookies.
pub struct RequestScope {
    ctx: RequestContext,
    released: bool,
}

impl RequestScope {
    pub(crate) fn new(ctx: RequestContext) -> Self {
        Self {
            ctx,
            released: false,
        }
    }

    pub fn finish(mut self) -> RequestContext {
        self.release();
        std::mem::take(&mut self.ctx)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(principal) = self.ctx.take_principal() {
            tracing::trace!(
                request_id = %self.ctx.request_id(),
                principal = principal.name(),
                "Released request principal"
            );
        }
    }
}

impl Deref for RequestScope {
    type Target = RequestContext;

    fn deref(&self) -> &Self::Target {
        &self.ctx
    }
}

impl DerefMut for RequestScope {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ctx
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_doubles::HashMapSessionStore;
    use gatehouse_core::SessionId;

    fn per_session(store: &HashMapSessionStore) -> SessionBinder {
        SessionBinder::new(AuthenticationMode::PerSession, Some(Arc::new(store.clone()))).unwrap()
    }

    #[test]
    fn per_session_requires_a_store() {
        let result = SessionBinder::new(AuthenticationMode::PerSession, None);
        assert!(matches!(result, Err(ConfigurationError::MissingSessionStore)));
        assert!(SessionBinder::new(AuthenticationMode::PerClient, None).is_ok());
    }

    #[tokio::test]
    async fn bind_creates_session_and_persists_principal() {
        let store = HashMapSessionStore::new();
        let binder = per_session(&store);
        let mut ctx = RequestContext::new();

        binder
            .bind(&mut ctx, Principal::new("foo", ["ROLE_USER"]))
            .await
            .unwrap();

        let session_id = ctx.session_id().expect("session created");
        let session = store.get(&session_id).await.unwrap().unwrap();
        assert_eq!(session.principal().map(Principal::name), Some("foo"));
        assert_eq!(binder.current_principal(&ctx).map(Principal::name), Some("foo"));
    }

    #[tokio::test]
    async fn restore_reads_principal_for_known_session() {
        let store = HashMapSessionStore::new();
        let binder = per_session(&store);
        let mut first = RequestContext::new();
        binder
            .bind(&mut first, Principal::new("foo", ["ROLE_USER"]))
            .await
            .unwrap();

        let mut second = RequestContext::new().with_session(first.session_id().unwrap());
        binder.restore(&mut second).await.unwrap();

        assert_eq!(second.principal(), first.principal());
    }

    #[tokio::test]
    async fn restore_drops_unknown_session_id() {
        let store = HashMapSessionStore::new();
        let binder = per_session(&store);
        let mut ctx = RequestContext::new().with_session(SessionId::new());

        binder.restore(&mut ctx).await.unwrap();

        assert!(ctx.session_id().is_none());
        assert!(ctx.principal().is_none());
    }

    #[tokio::test]
    async fn per_client_never_touches_the_store() {
        let store = HashMapSessionStore::new();
        let binder =
            SessionBinder::new(AuthenticationMode::PerClient, Some(Arc::new(store.clone())))
                .unwrap();
        let mut ctx = RequestContext::new();

        binder
            .bind(&mut ctx, Principal::new("foo", ["ROLE_USER"]))
            .await
            .unwrap();

        assert!(ctx.session_id().is_none());
        assert_eq!(store.len().await, 0);
        assert!(ctx.principal().is_some());
    }

    #[tokio::test]
    async fn unbind_keeps_session_but_forgets_principal() {
        let store = HashMapSessionStore::new();
        let binder = per_session(&store);
        let mut ctx = RequestContext::new();
        binder
            .bind(&mut ctx, Principal::new("foo", ["ROLE_USER"]))
            .await
            .unwrap();
        let session_id = ctx.session_id().unwrap();

        let removed = binder.unbind(&mut ctx).await.unwrap();

        assert_eq!(removed.map(|p| p.name().to_string()), Some("foo".to_string()));
        let session = store.get(&session_id).await.unwrap().expect("session kept");
        assert!(session.principal().is_none());
        assert!(binder.unbind(&mut ctx).await.unwrap().is_none());
    }

    #[test]
    fn scope_releases_principal_on_drop_and_finish() {
        let mut ctx = RequestContext::new();
        ctx.bind_principal(Principal::new("foo", ["ROLE_USER"]));

        let scope = RequestScope::new(ctx);
        assert!(scope.is_authenticated());
        let ctx = scope.finish();
        assert!(!ctx.is_authenticated());
    }
}
