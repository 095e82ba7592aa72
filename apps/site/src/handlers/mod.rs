//! Request handlers, one module per area.

pub mod contact;
pub mod gallery;
pub mod health;
pub mod locale;
pub mod seo;
pub mod session;

use axum::http::{header, HeaderMap};

use designo_media::identity::{extract_bearer_token, session_from_cookie};
use designo_media::User;

use crate::AppState;

/// Session token from `Authorization: Bearer` or the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(extract_bearer_token)
        .or_else(|| {
            headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(session_from_cookie)
        })
}

/// Signed-in user for the request, if any.
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Option<User> {
    state.identity.current_user(session_token(headers)).await
}
