use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use gatehouse_core::Verifier;

use crate::{ApiError, GatehouseState};

#[tracing::instrument(name = "Logout", skip_all)]
pub async fn logout<V>(
    State(state): State<GatehouseState<V>>,
    jar: CookieJar,
) -> Result<Response, ApiError>
where
    V: Verifier + 'static,
{
    let incoming = state.request_context(&jar);
    let mut scope = state.command().scope(incoming.ctx).await?;

    let result = state.command().logout(&mut scope, None).await;

    let mut ctx = scope.finish();
    let jar = state.write_cookies(jar, incoming.session_id, &mut ctx);

    Ok(match result {
        Ok(()) => (jar, Json(serde_json::json!({ "logged_out": true }))).into_response(),
        Err(e) => (jar, ApiError::from(e)).into_response(),
    })
}
