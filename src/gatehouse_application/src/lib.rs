pub mod login_command;
pub mod logout_handlers;
pub mod session_binder;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_doubles;

pub use login_command::{LoginCommand, LoginError};
pub use logout_handlers::SecurityContextLogoutHandler;
pub use session_binder::{RequestScope, ScopeError, SessionBinder};
pub use use_cases::{
    authenticate::AuthenticateUseCase,
    authorize::Authorizer,
    logout::{HandlerFailure, LogoutError, LogoutSequencer},
};
