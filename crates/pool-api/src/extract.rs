//! Session cookie handling, the authenticated-user extractor and body/query
//! extractors that reject with the API envelope.

use axum::{
    extract::{FromRequest, FromRequestParts},
    http::{header, request::Parts, HeaderMap, HeaderValue},
};

use pool_core::domain::User;
use pool_security::SessionToken;
use pool_shared::config::SessionSettings;
use pool_shared::messages;

use crate::error::ApiError;
use crate::state::AppState;

/// `Json` whose rejection is an [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Query` whose rejection is an [`ApiError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Token carried in the named cookie, if any.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<SessionToken> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .and_then(|(_, value)| SessionToken::from_raw(value))
}

pub fn session_cookie(settings: &SessionSettings, token: &SessionToken) -> Result<HeaderValue, ApiError> {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        settings.cookie_name,
        token.as_str(),
        settings.max_age_seconds
    );
    if settings.secure_cookie {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|e| ApiError::InternalError(e.to_string()))
}

pub fn expired_cookie(settings: &SessionSettings) -> Result<HeaderValue, ApiError> {
    let cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", settings.cookie_name);
    HeaderValue::from_str(&cookie).map_err(|e| ApiError::InternalError(e.to_string()))
}

/// The user behind the request's session cookie. Rejects with 401 when the
/// cookie is missing, unknown or points at a deleted user.
pub struct CurrentUser {
    pub user: User,
    pub token: SessionToken,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers, &state.session.cookie_name)
            .ok_or_else(|| ApiError::Unauthorized(messages::LOGIN_REQUIRED.to_string()))?;

        let user = state
            .auth
            .resolve_current_user(&token)
            .await
            .ok_or_else(|| ApiError::Unauthorized(messages::LOGIN_REQUIRED.to_string()))?;

        Ok(Self { user, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(secure: bool) -> SessionSettings {
        SessionSettings {
            cookie_name: "pool_session".into(),
            secure_cookie: secure,
            max_age_seconds: 3600,
        }
    }

    #[test]
    fn test_token_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; pool_session=abc123; lang=tr"));

        let token = session_token(&headers, "pool_session").unwrap();
        assert_eq!(token.as_str(), "abc123");
        assert!(session_token(&headers, "other").is_none());
    }

    #[test]
    fn test_blank_cookie_is_no_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("pool_session="));
        assert!(session_token(&headers, "pool_session").is_none());
    }

    #[test]
    fn test_cookie_attributes() {
        let token = SessionToken::from_raw("abc").unwrap();

        let plain = session_cookie(&settings(false), &token).unwrap();
        assert_eq!(
            plain.to_str().unwrap(),
            "pool_session=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=3600"
        );

        let secure = session_cookie(&settings(true), &token).unwrap();
        assert!(secure.to_str().unwrap().ends_with("; Secure"));

        let expired = expired_cookie(&settings(false)).unwrap();
        assert!(expired.to_str().unwrap().contains("Max-Age=0"));
    }
}
