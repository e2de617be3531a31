use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use gatehouse_core::Verifier;
use serde::{Deserialize, Serialize};

use crate::{ApiError, GatehouseState};

#[derive(Deserialize)]
pub struct AuthorizeRequest {
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthorizeResponse {
    pub authorized: bool,
}

/// Answers whether the caller holds any of `roles`. A denial is a regular
/// answer, not a fault.
#[tracing::instrument(name = "Authorize", skip_all)]
pub async fn authorize<V>(
    State(state): State<GatehouseState<V>>,
    jar: CookieJar,
    Json(request): Json<AuthorizeRequest>,
) -> Result<Response, ApiError>
where
    V: Verifier + 'static,
{
    let incoming = state.request_context(&jar);
    let scope = state.command().scope(incoming.ctx).await?;

    let authorized = state
        .command()
        .do_authorization(state.command().current_principal(&scope), request.roles);

    let mut ctx = scope.finish();
    let jar = state.write_cookies(jar, incoming.session_id, &mut ctx);

    Ok((jar, Json(AuthorizeResponse { authorized })).into_response())
}
