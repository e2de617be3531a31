use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use gatehouse_core::Verifier;
use secrecy::Secret;
use serde::Deserialize;

use super::PrincipalResponse;
use crate::{ApiError, GatehouseState};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<V>(
    State(state): State<GatehouseState<V>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError>
where
    V: Verifier + 'static,
{
    let incoming = state.request_context(&jar);
    let mut scope = state.command().scope(incoming.ctx).await?;

    let result = state
        .command()
        .do_authentication(&mut scope, &request.username, request.password)
        .await;

    let mut ctx = scope.finish();
    let jar = state.write_cookies(jar, incoming.session_id, &mut ctx);

    Ok(match result {
        Ok(principal) => (jar, Json(PrincipalResponse::from(&principal))).into_response(),
        Err(e) => (jar, ApiError::from(e)).into_response(),
    })
}
