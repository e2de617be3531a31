//! Which optional backends this build carries.

use gatehouse_core::ConfigurationError;
use secrecy::ExposeSecret;

use crate::config::{GatehouseSettings, SessionBackend, VerifierBackend};

/// Backends compiled into this build of the adapters crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeEnvironment {
    pub redis_store: bool,
    pub postgres_verifier: bool,
}

impl RuntimeEnvironment {
    pub fn detect() -> Self {
        Self {
            redis_store: cfg!(feature = "redis-store"),
            postgres_verifier: cfg!(feature = "postgres-verifier"),
        }
    }

    /// Fails when `settings` select a backend this build lacks, or when the
    /// remember-me section is enabled without a secret.
    pub fn check(&self, settings: &GatehouseSettings) -> Result<(), ConfigurationError> {
        if settings.session.backend == SessionBackend::Redis && !self.redis_store {
            return Err(ConfigurationError::BackendUnavailable("redis".to_string()));
        }
        if settings.verifier.backend == VerifierBackend::Postgres && !self.postgres_verifier {
            return Err(ConfigurationError::BackendUnavailable("postgres".to_string()));
        }
        if settings.remember_me.enabled && settings.remember_me.secret.expose_secret().is_empty() {
            return Err(ConfigurationError::Invalid(
                "remember_me.secret must be set when remember-me is enabled".to_string(),
            ));
        }
        Ok(())
    }
}
