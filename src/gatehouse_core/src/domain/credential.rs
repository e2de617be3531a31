use secrecy::Secret;

use super::username::{Username, UsernameError};

/// A single login attempt: who, and the secret they presented.
///
/// The password is wrapped in [`Secret`] so it is redacted from `Debug`
/// output and zeroized on drop. A credential lives only for the duration
/// of one verification.
#[derive(Debug, Clone)]
pub struct Credential {
    username: Username,
    password: Secret<String>,
}

impl Credential {
    pub fn new(username: Username, password: Secret<String>) -> Self {
        Self { username, password }
    }

    pub fn parse(username: &str, password: Secret<String>) -> Result<Self, UsernameError> {
        Ok(Self::new(Username::parse(username)?, password))
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password(&self) -> &Secret<String> {
        &self.password
    }
}
