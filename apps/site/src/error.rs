//! Error types for the site API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use designo_core::{CoreError, FetchFailure, ValidationError};
use designo_media::MediaError;

/// Site API errors.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Invalid input")]
    Validation(Vec<ValidationError>),

    #[error("Sign-in required: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Gallery fetch failed: {0}")]
    Fetch(FetchFailure),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

pub type SiteResult<T> = Result<T, SiteError>;

/// One invalid field.
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = match &self {
            SiteError::BadRequest(_) | SiteError::Validation(_) => StatusCode::BAD_REQUEST,
            SiteError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            SiteError::NotFound(_) => StatusCode::NOT_FOUND,
            SiteError::Fetch(_) | SiteError::Upstream(_) => StatusCode::BAD_GATEWAY,
            SiteError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let fields = match &self {
            SiteError::Validation(errors) => errors
                .iter()
                .map(|e| FieldError {
                    field: e.field().to_string(),
                    message: e.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };

        let retryable = match &self {
            SiteError::Fetch(failure) => Some(failure.retryable),
            _ => None,
        };

        let body = ErrorResponse {
            error: self.to_string(),
            status: status.as_u16(),
            fields,
            retryable,
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for SiteError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => SiteError::Validation(vec![e]),
            CoreError::NotSignedIn { action } => SiteError::Unauthorized(action),
            CoreError::AssetNotFound(id) => SiteError::NotFound(id),
            other => SiteError::BadRequest(other.to_string()),
        }
    }
}

impl From<MediaError> for SiteError {
    fn from(err: MediaError) -> Self {
        if err.is_config_error() {
            error!("Service misconfigured: {}", err);
            return SiteError::Unavailable(err.to_string());
        }
        match err {
            MediaError::Core(core) => core.into(),
            MediaError::NotFound(what) => SiteError::NotFound(what),
            other => {
                warn!("Upstream call failed: {}", other);
                SiteError::Upstream(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let status = |e: SiteError| e.into_response().status();

        assert_eq!(
            status(CoreError::UnknownCategory("portraits".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(
                CoreError::NotSignedIn {
                    action: "delete media".into()
                }
                .into()
            ),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status(MediaError::MissingCredential("RESEND_API_KEY".into()).into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status(MediaError::Timeout("10 s".into()).into()),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status(SiteError::Fetch(FetchFailure::new("timed out", true))),
            StatusCode::BAD_GATEWAY
        );
    }
}
