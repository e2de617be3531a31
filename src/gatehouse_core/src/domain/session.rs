use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::principal::Principal;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid session id")]
pub struct SessionIdError;

/// Opaque key of a server-side session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, SessionIdError> {
        Uuid::parse_str(raw).map(Self).map_err(|_| SessionIdError)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What a session store keeps per session: the persisted security identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    id: SessionId,
    principal: Option<Principal>,
}

impl SessionData {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            principal: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn set_principal(&mut self, principal: Principal) {
        self.principal = Some(principal);
    }

    pub fn clear_principal(&mut self) -> Option<Principal> {
        self.principal.take()
    }
}
