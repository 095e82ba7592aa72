//! Locale redirect and translation bundles.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde_json::Value;
use tracing::debug;

use designo_core::locale::localized_redirect;

use crate::error::SiteError;
use crate::AppState;

/// `GET /{lang}/translations`
pub async fn translations(State(state): State<AppState>, Path(lang): Path<String>) -> Json<Value> {
    Json(state.translations.load(&lang).await.into_value())
}

/// Fallback for every unrouted path: redirect to the visitor's locale, or 404
/// when the path is exempt or already localized.
pub async fn localize(headers: HeaderMap, uri: Uri) -> Response {
    let accept = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());

    match localized_redirect(uri.path(), accept) {
        Some(mut target) => {
            if let Some(query) = uri.query() {
                target.push('?');
                target.push_str(query);
            }
            debug!(from = %uri, to = %target, "Locale redirect");
            Redirect::temporary(&target).into_response()
        }
        None => SiteError::NotFound(uri.path().to_string()).into_response(),
    }
}
