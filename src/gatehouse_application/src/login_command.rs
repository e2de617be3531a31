//! The broker-facing login command.
//!
//! [`LoginCommand`] is configured through its setters, then started. Once
//! started its collaborators are frozen: the logout handler list is fixed,
//! and every further setter call fails with
//! [`ConfigurationError::AlreadyStarted`] until the command is stopped.
//!
//! ```ignore
//! let mut command = LoginCommand::new(verifier);
//! command
//!     .set_session_store(Arc::new(InMemorySessionStore::new(1800)))?
//!     .set_remember_me_services(Arc::new(remember_me))?;
//! command.start()?;
//!
//! let mut scope = command.scope(RequestContext::new()).await?;
//! let principal = command.do_authentication(&mut scope, "foo", password).await?;
//! assert!(command.do_authorization(Some(&principal), ["ROLE_USER"]));
//! command.logout(&mut scope, Some(&principal)).await?;
//! let ctx = scope.finish();
//! ```

use std::sync::Arc;

use gatehouse_core::{
    Authority, AuthenticationFailure, AuthenticationMode, ConfigurationError, LogoutHandler,
    NullRememberMeServices, NullSessionAuthenticationStrategy, Principal, RememberMeServices,
    RequestContext, SecuredOperation, SessionAuthenticationStrategy, SessionStore, Verifier,
};
use secrecy::Secret;

use crate::{
    logout_handlers::SecurityContextLogoutHandler,
    session_binder::{RequestScope, ScopeError, SessionBinder},
    use_cases::{
        authenticate::AuthenticateUseCase,
        authorize::Authorizer,
        logout::{LogoutError, LogoutSequencer},
    },
};

/// Error types for the login operation
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Login command is not started")]
    NotStarted,
    #[error(transparent)]
    Authentication(#[from] AuthenticationFailure),
}

/// Collaborators frozen by `start()`.
struct Started {
    binder: SessionBinder,
    sequencer: LogoutSequencer,
}

pub struct LoginCommand<V> {
    verifier: V,
    session_store: Option<Arc<dyn SessionStore>>,
    session_strategy: Arc<dyn SessionAuthenticationStrategy>,
    remember_me: Arc<dyn RememberMeServices>,
    logout_handlers: Option<Vec<Arc<dyn LogoutHandler>>>,
    mode: AuthenticationMode,
    invalidate_session: bool,
    authorizer: Authorizer,
    started: Option<Started>,
}

impl<V> LoginCommand<V>
where
    V: Verifier,
{
    pub fn new(verifier: V) -> Self {
        Self {
            verifier,
            session_store: None,
            session_strategy: Arc::new(NullSessionAuthenticationStrategy),
            remember_me: Arc::new(NullRememberMeServices),
            logout_handlers: None,
            mode: AuthenticationMode::PerSession,
            invalidate_session: true,
            authorizer: Authorizer,
            started: None,
        }
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    fn ensure_configurable(&self) -> Result<(), ConfigurationError> {
        if self.is_started() {
            return Err(ConfigurationError::AlreadyStarted);
        }
        Ok(())
    }

    pub fn set_session_store(
        &mut self,
        session_store: Arc<dyn SessionStore>,
    ) -> Result<&mut Self, ConfigurationError> {
        self.ensure_configurable()?;
        self.session_store = Some(session_store);
        Ok(self)
    }

    pub fn set_session_authentication_strategy(
        &mut self,
        strategy: Arc<dyn SessionAuthenticationStrategy>,
    ) -> Result<&mut Self, ConfigurationError> {
        self.ensure_configurable()?;
        self.session_strategy = strategy;
        Ok(self)
    }

    pub fn set_remember_me_services(
        &mut self,
        remember_me: Arc<dyn RememberMeServices>,
    ) -> Result<&mut Self, ConfigurationError> {
        self.ensure_configurable()?;
        self.remember_me = remember_me;
        Ok(self)
    }

    /// Replaces the logout handler chain. Handlers run in the given order.
    pub fn set_logout_handlers(
        &mut self,
        handlers: Vec<Arc<dyn LogoutHandler>>,
    ) -> Result<&mut Self, ConfigurationError> {
        self.ensure_configurable()?;
        self.logout_handlers = Some(handlers);
        Ok(self)
    }

    pub fn set_per_client_authentication(
        &mut self,
        per_client: bool,
    ) -> Result<&mut Self, ConfigurationError> {
        self.ensure_configurable()?;
        self.mode = AuthenticationMode::from_per_client(per_client);
        Ok(self)
    }

    /// Whether the default logout handler invalidates the session. Ignored
    /// when custom logout handlers are set, and always off per client.
    pub fn set_invalidate_session(
        &mut self,
        invalidate_session: bool,
    ) -> Result<&mut Self, ConfigurationError> {
        self.ensure_configurable()?;
        self.invalidate_session = invalidate_session;
        Ok(self)
    }

    pub fn mode(&self) -> AuthenticationMode {
        self.mode
    }

    pub fn is_per_client_authentication(&self) -> bool {
        self.mode.is_per_client()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Validates the configuration and freezes the collaborators.
    #[tracing::instrument(name = "LoginCommand::start", skip(self), fields(mode = ?self.mode))]
    pub fn start(&mut self) -> Result<(), ConfigurationError> {
        self.ensure_configurable()?;

        let binder = SessionBinder::new(self.mode, self.session_store.clone())?;
        let handlers = match &self.logout_handlers {
            Some(handlers) => handlers.clone(),
            None => vec![self.default_logout_handler()],
        };
        let sequencer = LogoutSequencer::new(handlers, binder.clone());

        tracing::info!(
            logout_handlers = ?sequencer.handler_names(),
            "Login command started"
        );
        self.started = Some(Started { binder, sequencer });
        Ok(())
    }

    fn default_logout_handler(&self) -> Arc<dyn LogoutHandler> {
        let invalidate = self.invalidate_session && !self.mode.is_per_client();
        Arc::new(
            SecurityContextLogoutHandler::new(self.session_store.clone())
                .with_invalidate_session(invalidate),
        )
    }

    pub fn is_started(&self) -> bool {
        self.started.is_some()
    }

    /// Names of the frozen logout handlers, in run order. Empty until started.
    pub fn logout_handler_names(&self) -> Vec<&str> {
        self.started
            .as_ref()
            .map(|started| started.sequencer.handler_names())
            .unwrap_or_default()
    }

    pub fn stop(&mut self) {
        if self.started.take().is_some() {
            tracing::info!("Login command stopped");
        }
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// Acquires a request context for one dispatch, restoring the principal
    /// persisted for its session (or one remembered via remember-me).
    pub async fn scope(&self, mut ctx: RequestContext) -> Result<RequestScope, ScopeError> {
        let started = self.started.as_ref().ok_or(ScopeError::NotStarted)?;

        started.binder.restore(&mut ctx).await?;
        if !ctx.is_authenticated() {
            if let Some(principal) = self.remember_me.auto_login(&mut ctx).await {
                tracing::debug!(principal = principal.name(), "Remember-me login");
                started.binder.bind(&mut ctx, principal).await?;
            }
        }
        Ok(RequestScope::new(ctx))
    }

    /// Authenticates `username`/`password` and binds the resulting principal
    /// to `ctx`.
    pub async fn do_authentication(
        &self,
        ctx: &mut RequestContext,
        username: &str,
        password: Secret<String>,
    ) -> Result<Principal, LoginError> {
        let started = self.started.as_ref().ok_or(LoginError::NotStarted)?;

        let use_case = AuthenticateUseCase::new(
            &self.verifier,
            &started.binder,
            self.session_strategy.as_ref(),
            self.remember_me.as_ref(),
        );
        Ok(use_case.execute(ctx, username, password).await?)
    }

    /// True iff `principal` holds at least one of `roles`.
    ///
    /// An empty role list is denied rather than treated as "permit all".
    pub fn do_authorization<I, A>(&self, principal: Option<&Principal>, roles: I) -> bool
    where
        I: IntoIterator<Item = A>,
        A: Into<Authority>,
    {
        match SecuredOperation::new(roles) {
            Ok(operation) => self.authorize(principal, &operation),
            Err(e) => {
                tracing::warn!(error = %e, "Denying operation without role requirement");
                false
            }
        }
    }

    pub fn authorize(&self, principal: Option<&Principal>, operation: &SecuredOperation) -> bool {
        self.authorizer.authorize(principal, operation)
    }

    /// Runs the logout handlers and clears the bound principal. Safe to call
    /// when nobody is logged in.
    pub async fn logout(
        &self,
        ctx: &mut RequestContext,
        principal: Option<&Principal>,
    ) -> Result<(), LogoutError> {
        let started = self.started.as_ref().ok_or(LogoutError::NotStarted)?;
        started.sequencer.run(ctx, principal).await
    }

    pub fn current_principal<'a>(&self, ctx: &'a RequestContext) -> Option<&'a Principal> {
        ctx.principal()
    }
}
