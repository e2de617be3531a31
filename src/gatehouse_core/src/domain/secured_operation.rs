use thiserror::Error;

use super::authority::{Authority, AuthoritySet};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("A secured operation must require at least one authority")]
pub struct EmptyRequirement;

/// The role requirement a destination declares for its operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecuredOperation {
    required: AuthoritySet,
}

impl SecuredOperation {
    pub fn new<I, A>(required: I) -> Result<Self, EmptyRequirement>
    where
        I: IntoIterator<Item = A>,
        A: Into<Authority>,
    {
        let required: AuthoritySet = required.into_iter().collect();
        if required.is_empty() {
            return Err(EmptyRequirement);
        }
        Ok(Self { required })
    }

    pub fn required(&self) -> &AuthoritySet {
        &self.required
    }
}
