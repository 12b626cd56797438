// ============================================================================
// Pool API - Auth Handlers
// File: crates/pool-api/src/handlers/auth.rs
// ============================================================================
//! Authentication HTTP handlers (login, logout, current user)

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use pool_core::domain::User;
use pool_core::services::{AuthFailure, AuthOutcome};
use pool_shared::messages;

use crate::error::ApiError;
use crate::extract::{expired_cookie, session_cookie, session_token, ApiJson, CurrentUser};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HotelDto {
    pub id: Uuid,
    pub name: String,
}

/// User DTO for responses
#[derive(Debug, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub is_admin: bool,
    pub role: String,
    pub hotel: Option<HotelDto>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
            role: user.role_label().to_string(),
            hotel: user.hotel.as_ref().map(|h| HotelDto {
                id: h.id,
                name: h.name.clone(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: UserDto,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Login handler - POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    let result = state.auth.login(&payload.username, &payload.password).await;

    match (result.outcome, result.token) {
        (AuthOutcome::Authenticated { user, message }, Some(token)) => {
            let cookie = session_cookie(&state.session, &token)?;
            let body = ApiResponse::success(LoginResponse {
                user: UserDto::from(&user),
                message,
            });
            Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
        }
        (AuthOutcome::Rejected { failure, message }, _) => Err(match failure {
            AuthFailure::MissingCredentials => ApiError::BadRequest(message),
            AuthFailure::UserNotFound | AuthFailure::InvalidCredential => ApiError::Unauthorized(message),
            AuthFailure::StoreUnavailable => ApiError::InternalError(message),
        }),
        (AuthOutcome::Authenticated { .. }, None) => {
            Err(ApiError::InternalError(messages::AUTH_FAILURE.to_string()))
        }
    }
}

/// Logout handler - POST /api/v1/auth/logout
///
/// Succeeds with or without a live session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    if let Some(token) = session_token(&headers, &state.session.cookie_name) {
        state.auth.logout(&token);
    }

    let cookie = expired_cookie(&state.session)?;
    let body = ApiResponse::success(MessageResponse {
        message: messages::LOGOUT_SUCCESS.to_string(),
    });
    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// Current user - GET /api/v1/auth/me
pub async fn me(current: CurrentUser) -> Json<ApiResponse<UserDto>> {
    Json(ApiResponse::success(UserDto::from(&current.user)))
}
