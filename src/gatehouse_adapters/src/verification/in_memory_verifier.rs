use std::{collections::HashMap, sync::Arc};

use gatehouse_core::{Credential, VerificationError, VerifiedIdentity, Verifier};
use secrecy::Secret;
use tokio::sync::RwLock;

use super::password::{PasswordHashError, compute_password_hash, verify_password_hash};

/// A user as the in-memory verifier keeps it.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub password_hash: Secret<String>,
    pub authorities: Vec<String>,
    pub enabled: bool,
}

#[derive(Default, Clone)]
pub struct InMemoryVerifier {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl InMemoryVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes `password` and registers the user, replacing any previous
    /// record under the same name.
    pub async fn add_user<I, S>(
        &self,
        username: &str,
        password: Secret<String>,
        authorities: I,
        enabled: bool,
    ) -> Result<(), PasswordHashError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let password_hash = compute_password_hash(password).await?;
        let record = UserRecord {
            password_hash,
            authorities: authorities.into_iter().map(Into::into).collect(),
            enabled,
        };
        self.users.write().await.insert(username.to_string(), record);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait::async_trait]
impl Verifier for InMemoryVerifier {
    #[tracing::instrument(name = "Validating credential in memory", skip_all)]
    async fn verify(&self, credential: &Credential) -> Result<VerifiedIdentity, VerificationError> {
        let username = credential.username().as_str();
        let record = self
            .users
            .read()
            .await
            .get(username)
            .cloned()
            .ok_or(VerificationError::UnknownIdentity)?;

        verify_password_hash(record.password_hash, credential.password().clone())
            .await
            .map_err(|e| match e {
                PasswordHashError::Mismatch => VerificationError::BadCredential,
                PasswordHashError::Unexpected(e) => VerificationError::Other(e),
            })?;

        if !record.enabled {
            return Err(VerificationError::Disabled);
        }
        Ok(VerifiedIdentity::new(username, record.authorities))
    }
}
