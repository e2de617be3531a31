use gatehouse_core::{
    AuthenticationFailure, Credential, FailureReason, Principal, RememberMeServices,
    RequestContext, SessionAuthenticationStrategy, Verifier,
};
use secrecy::Secret;

use crate::session_binder::SessionBinder;

/// Authenticate use case - turns a username/password pair into a bound
/// [`Principal`].
pub struct AuthenticateUseCase<'a, V>
where
    V: Verifier,
{
    verifier: &'a V,
    binder: &'a SessionBinder,
    session_strategy: &'a dyn SessionAuthenticationStrategy,
    remember_me: &'a dyn RememberMeServices,
}

impl<'a, V> AuthenticateUseCase<'a, V>
where
    V: Verifier,
{
    pub fn new(
        verifier: &'a V,
        binder: &'a SessionBinder,
        session_strategy: &'a dyn SessionAuthenticationStrategy,
        remember_me: &'a dyn RememberMeServices,
    ) -> Self {
        Self {
            verifier,
            binder,
            session_strategy,
            remember_me,
        }
    }

    /// Execute the authenticate use case
    ///
    /// On success the principal is bound to `ctx` (and its session), the
    /// session strategy is notified, then remember-me `login_success` fires.
    /// On any failure remember-me `login_fail` fires exactly once before the
    /// failure is returned.
    #[tracing::instrument(
        name = "AuthenticateUseCase::execute",
        skip(self, ctx, password),
        fields(request_id = %ctx.request_id())
    )]
    pub async fn execute(
        &self,
        ctx: &mut RequestContext,
        username: &str,
        password: Secret<String>,
    ) -> Result<Principal, AuthenticationFailure> {
        let credential = match Credential::parse(username, password) {
            Ok(credential) => credential,
            Err(e) => {
                return Err(self
                    .fail(ctx, AuthenticationFailure::new(FailureReason::UnknownIdentity, e.to_string()))
                    .await);
            }
        };

        let identity = match self.verifier.verify(&credential).await {
            Ok(identity) => identity,
            Err(e) => return Err(self.fail(ctx, e.into()).await),
        };
        drop(credential);

        let principal = Principal::with_authorities(identity.name, identity.authorities);

        if let Err(failure) = self.bind(ctx, &principal).await {
            if let Err(e) = self.binder.unbind(ctx).await {
                tracing::warn!(error = %e, "Failed to roll back principal binding");
            }
            return Err(self.fail(ctx, failure).await);
        }

        self.remember_me.login_success(ctx, &principal).await;
        tracing::info!(principal = principal.name(), "Login succeeded");

        Ok(principal)
    }

    async fn bind(
        &self,
        ctx: &mut RequestContext,
        principal: &Principal,
    ) -> Result<(), AuthenticationFailure> {
        self.binder
            .bind(ctx, principal.clone())
            .await
            .map_err(|e| AuthenticationFailure::other(e.to_string()))?;

        self.session_strategy
            .on_authentication(ctx, principal)
            .await
            .map_err(|e| AuthenticationFailure::other(e.to_string()))
    }

    async fn fail(
        &self,
        ctx: &mut RequestContext,
        failure: AuthenticationFailure,
    ) -> AuthenticationFailure {
        tracing::warn!(reason = %failure.reason, "Login failed");
        self.remember_me.login_fail(ctx).await;
        failure
    }
}
