use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use gatehouse_core::Verifier;

use super::PrincipalResponse;
use crate::{ApiError, GatehouseState};

#[tracing::instrument(name = "Principal", skip_all)]
pub async fn principal<V>(
    State(state): State<GatehouseState<V>>,
    jar: CookieJar,
) -> Result<Response, ApiError>
where
    V: Verifier + 'static,
{
    let incoming = state.request_context(&jar);
    let scope = state.command().scope(incoming.ctx).await?;

    let body = state
        .command()
        .current_principal(&scope)
        .map(PrincipalResponse::from);

    let mut ctx = scope.finish();
    let jar = state.write_cookies(jar, incoming.session_id, &mut ctx);

    Ok(match body {
        Some(body) => (jar, Json(body)).into_response(),
        None => (jar, ApiError::NotAuthenticated).into_response(),
    })
}
