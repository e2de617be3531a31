//! Gatehouse route handlers.
//!
//! Each handler runs exactly one command operation inside a request scope
//! and writes the resulting cookies, including on failure.

pub mod authorize;
pub mod login;
pub mod logout;
pub mod principal;

pub use authorize::authorize;
pub use login::login;
pub use logout::logout;
pub use principal::principal;

use gatehouse_core::Principal;
use serde::{Deserialize, Serialize};

/// A principal as the HTTP API presents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalResponse {
    pub name: String,
    pub authorities: Vec<String>,
}

impl From<&Principal> for PrincipalResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            name: principal.name().to_string(),
            authorities: principal
                .authorities()
                .iter()
                .map(|a| a.as_str().to_string())
                .collect(),
        }
    }
}
