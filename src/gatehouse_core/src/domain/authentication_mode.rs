use serde::{Deserialize, Serialize};

/// Whether an authenticated identity outlives the request that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationMode {
    /// The identity is persisted in the session store and restored on every
    /// request that carries the same session id.
    #[default]
    PerSession,
    /// Nothing is persisted; the caller supplies the principal per operation.
    PerClient,
}

impl AuthenticationMode {
    pub fn from_per_client(per_client: bool) -> Self {
        if per_client {
            Self::PerClient
        } else {
            Self::PerSession
        }
    }

    pub fn is_per_client(self) -> bool {
        matches!(self, Self::PerClient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_per_session() {
        assert_eq!(AuthenticationMode::default(), AuthenticationMode::PerSession);
        assert!(!AuthenticationMode::default().is_per_client());
    }

    #[test]
    fn deserializes_from_snake_case() {
        let mode: AuthenticationMode = serde_json::from_str(r#""per_client""#).unwrap();
        assert_eq!(mode, AuthenticationMode::PerClient);
    }
}
