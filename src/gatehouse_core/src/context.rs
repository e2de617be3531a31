//! Per-request execution context.
//!
//! Every command operation receives the [`RequestContext`] of the request it
//! serves as an explicit argument. The context carries what the request
//! brought in (session id, cookies) and what the response must carry out
//! (cookies to set or clear), plus the principal currently bound to the
//! request. Because each request owns its own context, concurrently running
//! requests can never observe each other's principal.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{principal::Principal, session::SessionId};

/// A cookie the response must set. A `max_age` of zero removes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCookie {
    pub name: String,
    pub value: String,
    pub max_age_seconds: Option<i64>,
    pub http_only: bool,
}

impl ResponseCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            max_age_seconds: None,
            http_only: true,
        }
    }

    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age_seconds = Some(seconds);
        self
    }

    pub fn removal(name: impl Into<String>) -> Self {
        Self::new(name, String::new()).with_max_age(0)
    }

    pub fn is_removal(&self) -> bool {
        self.max_age_seconds == Some(0)
    }
}

#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    session_id: Option<SessionId>,
    request_cookies: HashMap<String, String>,
    response_cookies: Vec<ResponseCookie>,
    principal: Option<Principal>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            session_id: None,
            request_cookies: HashMap::new(),
            response_cookies: Vec::new(),
            principal: None,
        }
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_request_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_cookies.insert(name.into(), value.into());
        self
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    pub fn set_session_id(&mut self, session_id: SessionId) {
        self.session_id = Some(session_id);
    }

    pub fn clear_session_id(&mut self) -> Option<SessionId> {
        self.session_id.take()
    }

    // ------------------------------------------------------------------
    // Bound principal
    // ------------------------------------------------------------------

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// Binds `principal`, returning whichever principal it replaced.
    pub fn bind_principal(&mut self, principal: Principal) -> Option<Principal> {
        self.principal.replace(principal)
    }

    pub fn take_principal(&mut self) -> Option<Principal> {
        self.principal.take()
    }

    // ------------------------------------------------------------------
    // Cookies
    // ------------------------------------------------------------------

    pub fn request_cookie(&self, name: &str) -> Option<&str> {
        self.request_cookies.get(name).map(String::as_str)
    }

    /// Queues a cookie for the response. A later cookie with the same name
    /// replaces an earlier one so the response never sets a name twice.
    pub fn add_response_cookie(&mut self, cookie: ResponseCookie) {
        self.response_cookies.retain(|c| c.name != cookie.name);
        self.response_cookies.push(cookie);
    }

    pub fn response_cookies(&self) -> &[ResponseCookie] {
        &self.response_cookies
    }

    pub fn response_cookie(&self, name: &str) -> Option<&ResponseCookie> {
        self.response_cookies.iter().find(|c| c.name == name)
    }

    pub fn take_response_cookies(&mut self) -> Vec<ResponseCookie> {
        std::mem::take(&mut self.response_cookies)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
