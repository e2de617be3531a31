//! Optional collaborators notified around authentication.

use async_trait::async_trait;
use thiserror::Error;

use super::session_store::SessionStoreError;
use crate::{context::RequestContext, domain::principal::Principal};

/// Remember-me style hooks.
///
/// `login_success` and `login_fail` run before the login outcome is handed
/// back to the caller, so any cookie they queue on the context makes it onto
/// the response.
#[async_trait]
pub trait RememberMeServices: Send + Sync {
    /// Restores a principal from a remember-me artifact carried by the
    /// request, if any.
    async fn auto_login(&self, _ctx: &mut RequestContext) -> Option<Principal> {
        None
    }

    async fn login_success(&self, ctx: &mut RequestContext, principal: &Principal);

    async fn login_fail(&self, ctx: &mut RequestContext);
}

#[derive(Debug, Error)]
pub enum SessionAuthenticationError {
    #[error("Session store error: {0}")]
    SessionStore(#[from] SessionStoreError),
    #[error("Authentication rejected by session strategy: {0}")]
    Rejected(String),
}

/// Reacts to a successful authentication on the session level, e.g. by
/// rotating the session id to defeat session fixation.
#[async_trait]
pub trait SessionAuthenticationStrategy: Send + Sync {
    async fn on_authentication(
        &self,
        ctx: &mut RequestContext,
        principal: &Principal,
    ) -> Result<(), SessionAuthenticationError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullRememberMeServices;

#[async_trait]
impl RememberMeServices for NullRememberMeServices {
    async fn login_success(&self, _ctx: &mut RequestContext, _principal: &Principal) {}

    async fn login_fail(&self, _ctx: &mut RequestContext) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSessionAuthenticationStrategy;

#[async_trait]
impl SessionAuthenticationStrategy for NullSessionAuthenticationStrategy {
    async fn on_authentication(
        &self,
        _ctx: &mut RequestContext,
        _principal: &Principal,
    ) -> Result<(), SessionAuthenticationError> {
        Ok(())
    }
}
