use config::{
    Config, ConfigError, Environment, File,
    builder::{ConfigBuilder, DefaultState},
};
use gatehouse_core::AuthenticationMode;
use secrecy::Secret;
use serde::Deserialize;

use super::constants::{CONFIG_FILE, defaults, env, prod};

#[derive(Debug, Clone, Deserialize)]
pub struct GatehouseSettings {
    pub login: LoginSettings,
    pub session: SessionSettings,
    pub remember_me: RememberMeSettings,
    pub redis: RedisSettings,
    pub postgres: PostgresSettings,
    pub verifier: VerifierSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginSettings {
    pub mode: AuthenticationMode,
    pub invalidate_session: bool,
    /// Extra cookies removed on logout.
    #[serde(default)]
    pub clear_cookies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    Memory,
    Redis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub ttl_seconds: u64,
    pub backend: SessionBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RememberMeSettings {
    pub enabled: bool,
    pub cookie_name: String,
    pub secret: Secret<String>,
    pub ttl_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    pub host_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifierBackend {
    Memory,
    Postgres,
}

/// A user registered with the in-memory verifier at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub password: Secret<String>,
    #[serde(default)]
    pub authorities: Vec<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifierSettings {
    pub backend: VerifierBackend,
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub address: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl GatehouseSettings {
    /// Loads `config/base.json` (if present) and `GATEHOUSE__*` environment
    /// variables on top of the built-in defaults. A `.env` file is read first.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::defaults()?
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(env::ENV_PREFIX)
                    .prefix_separator(env::ENV_SEPARATOR)
                    .separator(env::ENV_SEPARATOR),
            )
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("login.mode", "per_session")?
            .set_default("login.invalidate_session", true)?
            .set_default("session.cookie_name", defaults::SESSION_COOKIE_NAME)?
            .set_default("session.ttl_seconds", defaults::SESSION_TTL_SECONDS)?
            .set_default("session.backend", "memory")?
            .set_default("remember_me.enabled", false)?
            .set_default("remember_me.cookie_name", defaults::REMEMBER_ME_COOKIE_NAME)?
            .set_default("remember_me.secret", "")?
            .set_default("remember_me.ttl_seconds", defaults::REMEMBER_ME_TTL_SECONDS)?
            .set_default("redis.host_name", defaults::REDIS_HOST_NAME)?
            .set_default("postgres.url", defaults::POSTGRES_URL)?
            .set_default("verifier.backend", "memory")?
            .set_default("server.address", prod::APP_ADDRESS)
    }
}
