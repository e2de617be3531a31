use async_trait::async_trait;
use chrono::Utc;
use gatehouse_core::{
    LogoutHandler, LogoutHandlerError, Principal, RememberMeServices, RequestContext,
    ResponseCookie,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone)]
pub struct RememberMeConfig {
    pub cookie_name: String,
    pub secret: Secret<String>,
    pub token_ttl_in_seconds: i64,
}

impl RememberMeConfig {
    pub fn as_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}

#[derive(Debug, Error)]
pub enum RememberMeError {
    #[error("Token error: {0}")]
    TokenError(jsonwebtoken::errors::Error),
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RememberMeClaims {
    pub sub: String,
    pub authorities: Vec<String>,
    pub exp: usize,
}

/// Remember-me backed by a signed HS256 token in an HTTP-only cookie.
///
/// Successful logins issue the cookie; failed logins and logouts clear it.
/// A request carrying a valid cookie but no authenticated session is logged
/// back in with the principal recorded in the token.
#[derive(Clone)]
pub struct JwtRememberMeServices {
    config: RememberMeConfig,
}

impl JwtRememberMeServices {
    pub fn new(config: RememberMeConfig) -> Self {
        Self { config }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    pub fn generate_token(&self, principal: &Principal) -> Result<String, RememberMeError> {
        let delta = chrono::Duration::try_seconds(self.config.token_ttl_in_seconds).ok_or(
            RememberMeError::UnexpectedError("Failed to create token duration".to_string()),
        )?;

        let exp = Utc::now()
            .checked_add_signed(delta)
            .ok_or(RememberMeError::UnexpectedError(
                "Duration out of range".to_string(),
            ))?
            .timestamp();

        let exp: usize = exp.try_into().map_err(|_| {
            RememberMeError::UnexpectedError("Failed to cast i64 to usize".to_string())
        })?;

        let claims = RememberMeClaims {
            sub: principal.name().to_string(),
            authorities: principal
                .authorities()
                .iter()
                .map(|a| a.as_str().to_string())
                .collect(),
            exp,
        };

        encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.as_bytes()),
        )
        .map_err(RememberMeError::TokenError)
    }

    pub fn validate_token(&self, token: &str) -> Result<RememberMeClaims, RememberMeError> {
        decode::<RememberMeClaims>(
            token,
            &DecodingKey::from_secret(self.config.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(RememberMeError::TokenError)
    }

    fn clear_cookie(&self, ctx: &mut RequestContext) {
        ctx.add_response_cookie(ResponseCookie::removal(self.config.cookie_name.clone()));
    }
}

#[async_trait]
impl RememberMeServices for JwtRememberMeServices {
    async fn auto_login(&self, ctx: &mut RequestContext) -> Option<Principal> {
        let token = ctx.request_cookie(&self.config.cookie_name)?.to_string();

        match self.validate_token(&token) {
            Ok(claims) => Some(Principal::new(claims.sub, claims.authorities)),
            Err(e) => {
                tracing::debug!(error = %e, "Discarding invalid remember-me cookie");
                self.clear_cookie(ctx);
                None
            }
        }
    }

    async fn login_success(&self, ctx: &mut RequestContext, principal: &Principal) {
        match self.generate_token(principal) {
            Ok(token) => ctx.add_response_cookie(
                ResponseCookie::new(self.config.cookie_name.clone(), token)
                    .with_max_age(self.config.token_ttl_in_seconds),
            ),
            Err(e) => tracing::warn!(error = %e, "Failed to issue remember-me cookie"),
        }
    }

    async fn login_fail(&self, ctx: &mut RequestContext) {
        self.clear_cookie(ctx);
    }
}

#[async_trait]
impl LogoutHandler for JwtRememberMeServices {
    fn name(&self) -> &str {
        "remember-me"
    }

    async fn cleanup(
        &self,
        ctx: &mut RequestContext,
        _principal: Option<&Principal>,
    ) -> Result<(), LogoutHandlerError> {
        self.clear_cookie(ctx);
        Ok(())
    }
}
