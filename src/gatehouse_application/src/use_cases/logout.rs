use std::{fmt, sync::Arc};

use gatehouse_core::{LogoutHandler, LogoutHandlerError, Principal, RequestContext};

use crate::session_binder::SessionBinder;

/// A logout handler that failed, by name.
#[derive(Debug)]
pub struct HandlerFailure {
    pub handler: String,
    pub error: LogoutHandlerError,
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.handler, self.error)
    }
}

/// Error types for logout
#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error("Login command is not started")]
    NotStarted,
    #[error("{} logout step(s) failed: {}", .0.len(), join(.0))]
    Handlers(Vec<HandlerFailure>),
}

fn join(failures: &[HandlerFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Runs the configured logout handlers in registration order, then clears
/// the bound principal.
///
/// A failing handler does not stop the ones after it. Every failure is
/// collected and reported once all handlers (and the final unbind) ran.
#[derive(Clone)]
pub struct LogoutSequencer {
    handlers: Arc<[Arc<dyn LogoutHandler>]>,
    binder: SessionBinder,
}

impl LogoutSequencer {
    pub fn new(handlers: Vec<Arc<dyn LogoutHandler>>, binder: SessionBinder) -> Self {
        Self {
            handlers: handlers.into(),
            binder,
        }
    }

    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    #[tracing::instrument(name = "LogoutSequencer::run", skip_all, fields(request_id = %ctx.request_id()))]
    pub async fn run(
        &self,
        ctx: &mut RequestContext,
        principal: Option<&Principal>,
    ) -> Result<(), LogoutError> {
        let bound = ctx.principal().cloned();
        let principal = principal.or(bound.as_ref());
        let mut failures = Vec::new();

        for handler in self.handlers.iter() {
            if let Err(error) = handler.cleanup(ctx, principal).await {
                tracing::warn!(handler = handler.name(), %error, "Logout handler failed");
                failures.push(HandlerFailure {
                    handler: handler.name().to_string(),
                    error,
                });
            }
        }

        if let Err(error) = self.binder.unbind(ctx).await {
            tracing::warn!(%error, "Failed to clear persisted principal");
            failures.push(HandlerFailure {
                handler: "session-binder".to_string(),
                error: error.into(),
            });
        }

        match principal {
            Some(p) => tracing::info!(principal = p.name(), "Logged out"),
            None => tracing::debug!("Logout without a bound principal"),
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LogoutError::Handlers(failures))
        }
    }
}
