use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    authority::{Authority, AuthoritySet},
    credential::Credential,
};

/// What a verifier vouches for after checking a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub name: String,
    pub authorities: AuthoritySet,
}

impl VerifiedIdentity {
    pub fn new<I, A>(name: impl Into<String>, authorities: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Authority>,
    {
        Self {
            name: name.into(),
            authorities: authorities.into_iter().collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("Unknown identity")]
    UnknownIdentity,
    #[error("Bad credential")]
    BadCredential,
    #[error("Account disabled")]
    Disabled,
    #[error("Verification failed: {0}")]
    Other(String),
}

impl PartialEq for VerificationError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UnknownIdentity, Self::UnknownIdentity)
                | (Self::BadCredential, Self::BadCredential)
                | (Self::Disabled, Self::Disabled)
                | (Self::Other(_), Self::Other(_))
        )
    }
}

/// Port to the external credential verifier.
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, credential: &Credential) -> Result<VerifiedIdentity, VerificationError>;
}

#[async_trait]
impl<T: Verifier + ?Sized> Verifier for Arc<T> {
    async fn verify(&self, credential: &Credential) -> Result<VerifiedIdentity, VerificationError> {
        (**self).verify(credential).await
    }
}
