use gatehouse_core::{Credential, VerificationError, VerifiedIdentity, Verifier};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, Pool, Postgres};

use super::password::{PasswordHashError, compute_password_hash, verify_password_hash};

/// Verifies credentials against the `users` and `user_authorities` tables.
pub struct PostgresVerifier {
    pool: PgPool,
}

impl PostgresVerifier {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresVerifier { pool }
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    pub async fn add_user(
        &self,
        username: &str,
        password: Secret<String>,
        authorities: &[&str],
        enabled: bool,
    ) -> Result<(), VerificationError> {
        let password_hash = compute_password_hash(password)
            .await
            .map_err(|e| VerificationError::Other(e.to_string()))?;

        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        sqlx::query(
            r#"
                INSERT INTO users (username, password_hash, enabled)
                VALUES ($1, $2, $3)
            "#,
        )
        .bind(username)
        .bind(password_hash.expose_secret())
        .bind(enabled)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        for authority in authorities {
            sqlx::query(
                r#"
                    INSERT INTO user_authorities (username, authority)
                    VALUES ($1, $2)
                "#,
            )
            .bind(username)
            .bind(*authority)
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        }

        tx.commit().await.map_err(unexpected)
    }
}

fn unexpected(e: sqlx::Error) -> VerificationError {
    VerificationError::Other(e.to_string())
}

#[async_trait::async_trait]
impl Verifier for PostgresVerifier {
    #[tracing::instrument(name = "Validating credential in PostgreSQL", skip_all)]
    async fn verify(&self, credential: &Credential) -> Result<VerifiedIdentity, VerificationError> {
        let username = credential.username().as_str();

        let row: Option<(String, bool)> = sqlx::query_as(
            r#"
                SELECT password_hash, enabled
                FROM users
                WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        let Some((password_hash, enabled)) = row else {
            return Err(VerificationError::UnknownIdentity);
        };

        verify_password_hash(Secret::new(password_hash), credential.password().clone())
            .await
            .map_err(|e| match e {
                PasswordHashError::Mismatch => VerificationError::BadCredential,
                PasswordHashError::Unexpected(e) => VerificationError::Other(e),
            })?;

        if !enabled {
            return Err(VerificationError::Disabled);
        }

        let authorities: Vec<String> = sqlx::query_scalar(
            r#"
                SELECT authority
                FROM user_authorities
                WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(VerifiedIdentity::new(username, authorities))
    }
}
