use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ports::verifier::VerificationError;

/// Why a login was rejected. Front-ends map these onto their own fault codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    UnknownIdentity,
    BadCredential,
    Disabled,
    Other,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UnknownIdentity => "unknown identity",
            Self::BadCredential => "bad credential",
            Self::Disabled => "account disabled",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Authentication failed ({reason}): {message}")]
pub struct AuthenticationFailure {
    pub reason: FailureReason,
    pub message: String,
}

impl AuthenticationFailure {
    pub fn new(reason: FailureReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(FailureReason::Other, message)
    }
}

impl From<VerificationError> for AuthenticationFailure {
    fn from(error: VerificationError) -> Self {
        let reason = match &error {
            VerificationError::UnknownIdentity => FailureReason::UnknownIdentity,
            VerificationError::BadCredential => FailureReason::BadCredential,
            VerificationError::Disabled => FailureReason::Disabled,
            VerificationError::Other(_) => FailureReason::Other,
        };
        Self::new(reason, error.to_string())
    }
}

/// Invalid setup detected at startup. Never a per-request condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Per-session authentication requires a session store")]
    MissingSessionStore,
    #[error("Login command is already started")]
    AlreadyStarted,
    #[error("Backend `{0}` is not available in this build")]
    BackendUnavailable(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
