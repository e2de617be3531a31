use async_trait::async_trait;
use gatehouse_core::{LogoutHandler, LogoutHandlerError, Principal, RequestContext, ResponseCookie};

/// Clears the named cookies on logout.
#[derive(Debug, Clone)]
pub struct CookieClearingLogoutHandler {
    cookie_names: Vec<String>,
}

impl CookieClearingLogoutHandler {
    pub fn new<I, S>(cookie_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cookie_names: cookie_names.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl LogoutHandler for CookieClearingLogoutHandler {
    fn name(&self) -> &str {
        "cookie-clearing"
    }

    async fn cleanup(
        &self,
        ctx: &mut RequestContext,
        _principal: Option<&Principal>,
    ) -> Result<(), LogoutHandlerError> {
        for name in &self.cookie_names {
            ctx.add_response_cookie(ResponseCookie::removal(name.clone()));
        }
        Ok(())
    }
}
