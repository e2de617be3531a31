use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gatehouse_application::{LoginError, LogoutError, ScopeError};
use gatehouse_core::{AuthenticationFailure, FailureReason};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CLIENT_AUTHENTICATION: &str = "Client.Authentication";
pub const CLIENT_DATA: &str = "Client.Data";
pub const SERVER_PROCESSING: &str = "Server.Processing";

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fault_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<FailureReason>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    AuthenticationFailed(AuthenticationFailure),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, fault_code, reason) = match &self {
            ApiError::AuthenticationFailed(failure) => (
                StatusCode::UNAUTHORIZED,
                CLIENT_AUTHENTICATION,
                Some(failure.reason),
            ),
            ApiError::NotAuthenticated => (StatusCode::UNAUTHORIZED, CLIENT_AUTHENTICATION, None),
            ApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, CLIENT_DATA, None),
            ApiError::UnexpectedError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_PROCESSING, None)
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            fault_code: fault_code.to_string(),
            reason,
        });

        (status_code, body).into_response()
    }
}

impl From<LoginError> for ApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::Authentication(failure) if failure.reason == FailureReason::Other => {
                ApiError::UnexpectedError(failure.to_string())
            }
            LoginError::Authentication(failure) => ApiError::AuthenticationFailed(failure),
            LoginError::NotStarted => {
                ApiError::UnexpectedError("Login command is not started".to_string())
            }
        }
    }
}

impl From<LogoutError> for ApiError {
    fn from(error: LogoutError) -> Self {
        ApiError::UnexpectedError(error.to_string())
    }
}

impl From<ScopeError> for ApiError {
    fn from(error: ScopeError) -> Self {
        ApiError::UnexpectedError(error.to_string())
    }
}
