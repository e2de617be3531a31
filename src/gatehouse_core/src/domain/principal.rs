use serde::{Deserialize, Serialize};

use super::authority::{Authority, AuthoritySet};

/// A verified identity together with the authorities it was granted.
///
/// Principals are immutable once issued. Re-authenticating produces a new
/// value instead of touching an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    name: String,
    authorities: AuthoritySet,
}

impl Principal {
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

    pub fn with_authorities(name: impl Into<String>, authorities: AuthoritySet) -> Self {
        Self {
            name: name.into(),
            authorities,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn authorities(&self) -> &AuthoritySet {
        &self.authorities
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }
}
