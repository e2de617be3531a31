use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

/// An opaque permission token such as `ROLE_USER`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Authority(String);

impl Authority {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Authority {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Authority {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for Authority {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered, duplicate-free set of authorities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthoritySet(BTreeSet<Authority>);

impl AuthoritySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, authority: &str) -> bool {
        self.0.iter().any(|a| a.as_str() == authority)
    }

    /// True when at least one authority is held by both sets.
    pub fn intersects(&self, other: &AuthoritySet) -> bool {
        let (small, large) = if self.0.len() <= other.0.len() {
            (&self.0, &other.0)
        } else {
            (&other.0, &self.0)
        };
        small.iter().any(|a| large.contains(a))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Authority> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<A: Into<Authority>> FromIterator<A> for AuthoritySet {
    fn from_iter<I: IntoIterator<Item = A>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a AuthoritySet {
    type Item = &'a Authority;
    type IntoIter = std::collections::btree_set::Iter<'a, Authority>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
