//! Assembles a started login command from settings.

use std::sync::Arc;

use gatehouse_adapters::{
    ChangeSessionIdStrategy, CookieClearingLogoutHandler, InMemorySessionStore, InMemoryVerifier,
    JwtRememberMeServices, RememberMeConfig, RuntimeEnvironment,
    config::{GatehouseSettings, SessionBackend, VerifierBackend},
    verification::PasswordHashError,
};
use gatehouse_application::{LoginCommand, SecurityContextLogoutHandler};
use gatehouse_core::{ConfigurationError, LogoutHandler, SessionStore, Verifier};
use thiserror::Error;

pub type DynVerifier = Arc<dyn Verifier>;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Failed to seed users: {0}")]
    Seed(#[from] PasswordHashError),
    #[cfg(feature = "postgres-verifier")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[cfg(feature = "postgres-verifier")]
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[cfg(feature = "redis-store")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Builds every collaborator `settings` ask for, wires them into a login
/// command and starts it.
#[tracing::instrument(name = "Bootstrap", skip_all)]
pub async fn build_command(
    settings: &GatehouseSettings,
) -> Result<Arc<LoginCommand<DynVerifier>>, BootstrapError> {
    RuntimeEnvironment::detect().check(settings)?;

    let session_store = build_session_store(settings)?;
    let verifier = build_verifier(settings).await?;
    let per_client = settings.login.mode.is_per_client();

    let mut command = LoginCommand::new(verifier);
    command
        .set_session_store(Arc::clone(&session_store))?
        .set_per_client_authentication(per_client)?
        .set_invalidate_session(settings.login.invalidate_session)?;
    if !per_client {
        command.set_session_authentication_strategy(Arc::new(ChangeSessionIdStrategy::new(
            Arc::clone(&session_store),
        )))?;
    }

    let mut logout_handlers: Vec<Arc<dyn LogoutHandler>> = vec![Arc::new(
        SecurityContextLogoutHandler::new(Some(session_store))
            .with_invalidate_session(settings.login.invalidate_session && !per_client),
    )];

    if settings.remember_me.enabled {
        let remember_me = Arc::new(JwtRememberMeServices::new(RememberMeConfig {
            cookie_name: settings.remember_me.cookie_name.clone(),
            secret: settings.remember_me.secret.clone(),
            token_ttl_in_seconds: settings.remember_me.ttl_seconds,
        }));
        command.set_remember_me_services(remember_me.clone())?;
        logout_handlers.push(remember_me);
    }

    if !settings.login.clear_cookies.is_empty() {
        logout_handlers.push(Arc::new(CookieClearingLogoutHandler::new(
            settings.login.clear_cookies.iter().cloned(),
        )));
    }

    command.set_logout_handlers(logout_handlers)?;
    command.start()?;

    Ok(Arc::new(command))
}

fn build_session_store(
    settings: &GatehouseSettings,
) -> Result<Arc<dyn SessionStore>, BootstrapError> {
    match settings.session.backend {
        SessionBackend::Memory => Ok(Arc::new(InMemorySessionStore::new(
            settings.session.ttl_seconds,
        ))),
        #[cfg(feature = "redis-store")]
        SessionBackend::Redis => {
            let redis_url = format!("redis://{}/", settings.redis.host_name);
            let conn = redis::Client::open(redis_url)?.get_connection()?;
            Ok(Arc::new(gatehouse_adapters::RedisSessionStore::new(
                Arc::new(tokio::sync::RwLock::new(conn)),
                settings.session.ttl_seconds,
            )))
        }
        #[cfg(not(feature = "redis-store"))]
        SessionBackend::Redis => {
            Err(ConfigurationError::BackendUnavailable("redis".to_string()).into())
        }
    }
}

async fn build_verifier(settings: &GatehouseSettings) -> Result<DynVerifier, BootstrapError> {
    match settings.verifier.backend {
        VerifierBackend::Memory => {
            let verifier = InMemoryVerifier::new();
            for user in &settings.verifier.users {
                verifier
                    .add_user(
                        &user.username,
                        user.password.clone(),
                        user.authorities.iter().cloned(),
                        user.enabled,
                    )
                    .await?;
            }
            tracing::info!(users = verifier.len().await, "Seeded in-memory verifier");
            Ok(Arc::new(verifier))
        }
        #[cfg(feature = "postgres-verifier")]
        VerifierBackend::Postgres => {
            use secrecy::ExposeSecret;

            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(settings.postgres.url.expose_secret())
                .await?;
            let verifier = gatehouse_adapters::PostgresVerifier::new(pool);
            verifier.migrate().await?;
            Ok(Arc::new(verifier))
        }
        #[cfg(not(feature = "postgres-verifier"))]
        VerifierBackend::Postgres => {
            Err(ConfigurationError::BackendUnavailable("postgres".to_string()).into())
        }
    }
}
