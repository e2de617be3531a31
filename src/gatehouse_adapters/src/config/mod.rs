pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{
    GatehouseSettings, LoginSettings, PostgresSettings, RedisSettings, RememberMeSettings,
    SeedUser, ServerSettings, SessionBackend, SessionSettings, VerifierBackend, VerifierSettings,
};
