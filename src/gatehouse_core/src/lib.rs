pub mod context;
pub mod domain;
pub mod error;
pub mod ports;

// Re-export commonly used types for convenience
pub use context::{RequestContext, ResponseCookie};

pub use domain::{
    authentication_mode::AuthenticationMode,
    authority::{Authority, AuthoritySet},
    credential::Credential,
    principal::Principal,
    secured_operation::{EmptyRequirement, SecuredOperation},
    session::{SessionData, SessionId, SessionIdError},
    username::{Username, UsernameError},
};

pub use error::{AuthenticationFailure, ConfigurationError, FailureReason};

pub use ports::{
    hooks::{
        NullRememberMeServices, NullSessionAuthenticationStrategy, RememberMeServices,
        SessionAuthenticationError, SessionAuthenticationStrategy,
    },
    logout_handler::{LogoutHandler, LogoutHandlerError},
    session_store::{SessionStore, SessionStoreError},
    verifier::{VerificationError, VerifiedIdentity, Verifier},
};
