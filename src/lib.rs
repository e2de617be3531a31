//! # Gatehouse - login command library
//!
//! Facade crate re-exporting the public API of the gatehouse components.
//!
//! ## Structure
//!
//! - **Core domain types**: `Principal`, `Authority`, `SecuredOperation`, `RequestContext`, ...
//! - **Ports**: `Verifier`, `SessionStore`, `RememberMeServices`, `LogoutHandler`, ...
//! - **Application**: `LoginCommand` and the use cases behind it
//! - **Adapters**: in-memory, Redis and PostgreSQL backends, remember-me, settings
//! - **Service**: `GatehouseService` - the HTTP front-end

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use gatehouse_core::*;
}

pub use gatehouse_core::{
    AuthenticationFailure, AuthenticationMode, Authority, AuthoritySet, ConfigurationError,
    Credential, FailureReason, Principal, RequestContext, ResponseCookie, SecuredOperation,
    SessionData, SessionId, Username,
};

// ============================================================================
// Ports
// ============================================================================

/// Collaborator traits the login command is wired with
pub mod ports {
    pub use gatehouse_core::{
        LogoutHandler, LogoutHandlerError, NullRememberMeServices,
        NullSessionAuthenticationStrategy, RememberMeServices, SessionAuthenticationError,
        SessionAuthenticationStrategy, SessionStore, SessionStoreError, VerificationError,
        VerifiedIdentity, Verifier,
    };
}

pub use ports::{LogoutHandler, RememberMeServices, SessionAuthenticationStrategy, SessionStore, Verifier};

// ============================================================================
// Application Layer
// ============================================================================

/// Login command and use cases
pub mod application {
    pub use gatehouse_application::*;
}

pub use gatehouse_application::{
    LoginCommand, LoginError, LogoutError, RequestScope, ScopeError, SecurityContextLogoutHandler,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    pub use gatehouse_adapters::*;
}

pub use gatehouse_adapters::{
    ChangeSessionIdStrategy, CookieClearingLogoutHandler, GatehouseSettings, InMemorySessionStore,
    InMemoryVerifier, JwtRememberMeServices, RememberMeConfig, RuntimeEnvironment,
};
#[cfg(feature = "postgres-verifier")]
pub use gatehouse_adapters::PostgresVerifier;
#[cfg(feature = "redis-store")]
pub use gatehouse_adapters::RedisSessionStore;

// ============================================================================
// HTTP
// ============================================================================

/// Axum routes and adapters
pub mod http {
    pub use gatehouse_axum::*;
}

pub use gatehouse_service::{AllowedOrigins, GatehouseService, build_command};

// ============================================================================
// Re-exported dependencies
// ============================================================================

pub use async_trait::async_trait;
pub use secrecy::{ExposeSecret, Secret};
