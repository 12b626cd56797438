use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use pool_core::error::{DomainError, ErrorKind};
use pool_shared::messages;

use crate::response::ApiResponse;

/// HTTP-facing error. Messages are the localized, user-safe strings; the
/// underlying detail is logged where the failure happened.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    /// Picks the status class from the domain error, keeping `message`
    /// as the client-visible text.
    pub fn from_domain(error: &DomainError, message: impl Into<String>) -> Self {
        let message = message.into();
        match error.kind() {
            ErrorKind::InputInvalid => ApiError::BadRequest(message),
            ErrorKind::NotFound => ApiError::NotFound(message),
            ErrorKind::Unauthorized => ApiError::Forbidden(message),
            ErrorKind::Conflict => ApiError::Conflict(message),
            ErrorKind::StoreFailure => ApiError::InternalError(message),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Request body rejected: {}", rejection.body_text());
        ApiError::BadRequest(format!(
            "{}{}",
            messages::SUBMIT_VALIDATION_PREFIX,
            messages::REQUEST_BODY_INVALID
        ))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Query string rejected: {}", rejection.body_text());
        ApiError::BadRequest(format!(
            "{}{}",
            messages::SUBMIT_VALIDATION_PREFIX,
            messages::REQUEST_QUERY_INVALID
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::InternalError(msg) => {
                tracing::error!("Request failed: {}", msg);
                msg
            }
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::Conflict(msg) => {
                tracing::warn!("{} ({}): {}", self.code(), status.as_u16(), msg);
                msg
            }
        };

        let body = Json(ApiResponse::<()>::error(self.code(), message));
        (status, body).into_response()
    }
}
