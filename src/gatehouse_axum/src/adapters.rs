//! Conversion between axum cookie jars and request contexts.

use std::sync::Arc;

use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use gatehouse_application::LoginCommand;
use gatehouse_core::{RequestContext, ResponseCookie, SessionId};

/// Shared state of the gatehouse routes.
pub struct GatehouseState<V> {
    command: Arc<LoginCommand<V>>,
    session_cookie_name: Arc<str>,
}

impl<V> Clone for GatehouseState<V> {
    fn clone(&self) -> Self {
        Self {
            command: Arc::clone(&self.command),
            session_cookie_name: Arc::clone(&self.session_cookie_name),
        }
    }
}

/// A request context together with the session id the client presented.
pub struct IncomingContext {
    pub ctx: RequestContext,
    pub session_id: Option<SessionId>,
}

impl<V> GatehouseState<V> {
    pub fn new(command: Arc<LoginCommand<V>>, session_cookie_name: impl Into<Arc<str>>) -> Self {
        Self {
            command,
            session_cookie_name: session_cookie_name.into(),
        }
    }

    pub fn command(&self) -> &LoginCommand<V> {
        &self.command
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.session_cookie_name
    }

    /// Builds the context for one request from its cookies. A session cookie
    /// that is not a valid session id is ignored.
    pub fn request_context(&self, jar: &CookieJar) -> IncomingContext {
        let mut ctx = RequestContext::new();
        for cookie in jar.iter() {
            ctx = ctx.with_request_cookie(cookie.name(), cookie.value());
        }

        let session_id = jar
            .get(&self.session_cookie_name)
            .and_then(|c| SessionId::parse(c.value()).ok());
        if let Some(id) = session_id {
            ctx.set_session_id(id);
        }

        IncomingContext { ctx, session_id }
    }

    /// Writes the cookies queued on `ctx` into `jar`, plus the session cookie
    /// when the session id changed during the request.
    pub fn write_cookies(
        &self,
        mut jar: CookieJar,
        presented: Option<SessionId>,
        ctx: &mut RequestContext,
    ) -> CookieJar {
        for cookie in ctx.take_response_cookies() {
            jar = apply(jar, cookie);
        }

        let current = ctx.session_id();
        if current != presented {
            let cookie = match current {
                Some(id) => ResponseCookie::new(self.session_cookie_name.to_string(), id.to_string()),
                None => ResponseCookie::removal(self.session_cookie_name.to_string()),
            };
            jar = apply(jar, cookie);
        }
        jar
    }
}

fn apply(jar: CookieJar, cookie: ResponseCookie) -> CookieJar {
    if cookie.is_removal() {
        return jar.remove(Cookie::build(cookie.name).path("/"));
    }

    let mut raw = format!("{}={}; Path=/", cookie.name, cookie.value);
    if cookie.http_only {
        raw.push_str("; HttpOnly");
    }
    if let Some(seconds) = cookie.max_age_seconds {
        raw.push_str(&format!("; Max-Age={seconds}"));
    }

    match Cookie::parse(raw) {
        Ok(mut parsed) => {
            parsed.set_same_site(SameSite::Lax);
            jar.add(parsed)
        }
        Err(e) => {
            tracing::warn!(cookie = %cookie.name, error = %e, "Dropping malformed response cookie");
            jar
        }
    }
}
