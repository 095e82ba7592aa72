//! Current session and dashboard greeting.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Timelike;
use serde::Serialize;

use designo_core::Greeting;

use super::current_user;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SessionInfo {
    pub signed_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    pub greeting: Greeting,
    pub greeting_key: &'static str,
}

/// `GET /api/me`
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Json<SessionInfo> {
    let user = current_user(&state, &headers).await;
    let greeting = Greeting::for_hour(chrono::Local::now().hour());

    Json(SessionInfo {
        signed_in: user.is_some(),
        first_name: user.and_then(|u| u.first_name),
        greeting,
        greeting_key: greeting.translation_key(),
    })
}
