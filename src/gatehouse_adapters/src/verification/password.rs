use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core},
};
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password does not match")]
    Mismatch,
    #[error("Password hashing failed: {0}")]
    Unexpected(String),
}

fn hasher() -> Result<Argon2<'static>, PasswordHashError> {
    let params =
        Params::new(15000, 2, 1, None).map_err(|e| PasswordHashError::Unexpected(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

#[tracing::instrument(name = "Verify password hash", skip_all)]
pub(crate) async fn verify_password_hash(
    expected_password_hash: Secret<String>,
    password_candidate: Secret<String>,
) -> Result<(), PasswordHashError> {
    let current_span: tracing::Span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| {
            let expected_password_hash = PasswordHash::new(expected_password_hash.expose_secret())
                .map_err(|e| PasswordHashError::Unexpected(e.to_string()))?;

            hasher()?
                .verify_password(
                    password_candidate.expose_secret().as_bytes(),
                    &expected_password_hash,
                )
                .map_err(|e| match e {
                    argon2::password_hash::Error::Password => PasswordHashError::Mismatch,
                    other => PasswordHashError::Unexpected(other.to_string()),
                })
        })
    })
    .await
    .map_err(|e| PasswordHashError::Unexpected(e.to_string()))?
}

/// Hashes `password` as an argon2id PHC string.
#[tracing::instrument(name = "Computing password hash", skip_all)]
pub async fn compute_password_hash(
    password: Secret<String>,
) -> Result<Secret<String>, PasswordHashError> {
    let current_span: tracing::Span = tracing::Span::current();
    tokio::task::spawn_blocking(move || {
        current_span.in_scope(move || {
            let salt = SaltString::generate(rand_core::OsRng);
            hasher()?
                .hash_password(password.expose_secret().as_bytes(), &salt)
                .map(|h| Secret::new(h.to_string()))
                .map_err(|e| PasswordHashError::Unexpected(e.to_string()))
        })
    })
    .await
    .map_err(|e| PasswordHashError::Unexpected(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> Secret<String> {
        Secret::new(s.to_string())
    }

    #[tokio::test]
    async fn hash_verifies_only_the_original_password() {
        let hash = compute_password_hash(secret("bar")).await.unwrap();
        assert!(hash.expose_secret().starts_with("$argon2id$"));

        verify_password_hash(hash.clone(), secret("bar")).await.unwrap();
        assert!(matches!(
            verify_password_hash(hash, secret("baz")).await,
            Err(PasswordHashError::Mismatch)
        ));
    }

    #[tokio::test]
    async fn malformed_hash_is_unexpected() {
        assert!(matches!(
            verify_password_hash(secret("not-a-hash"), secret("bar")).await,
            Err(PasswordHashError::Unexpected(_))
        ));
    }
}
