pub mod config;
pub mod logout;
pub mod persistence;
pub mod remember_me;
pub mod runtime_environment;
pub mod session_strategy;
pub mod verification;

pub use config::GatehouseSettings;
pub use logout::CookieClearingLogoutHandler;
pub use persistence::InMemorySessionStore;
#[cfg(feature = "redis-store")]
pub use persistence::RedisSessionStore;
pub use remember_me::{JwtRememberMeServices, RememberMeConfig, RememberMeError};
pub use runtime_environment::RuntimeEnvironment;
pub use session_strategy::ChangeSessionIdStrategy;
pub use verification::{InMemoryVerifier, compute_password_hash};
#[cfg(feature = "postgres-verifier")]
pub use verification::PostgresVerifier;
