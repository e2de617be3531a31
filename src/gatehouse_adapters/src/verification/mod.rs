mod password;

pub mod in_memory_verifier;
#[cfg(feature = "postgres-verifier")]
pub mod postgres_verifier;

pub use in_memory_verifier::{InMemoryVerifier, UserRecord};
pub use password::{PasswordHashError, compute_password_hash};
#[cfg(feature = "postgres-verifier")]
pub use postgres_verifier::PostgresVerifier;
