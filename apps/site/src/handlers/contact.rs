//! Contact form submission.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use designo_core::ContactForm;
use designo_media::EmailMessage;

use crate::error::{SiteError, SiteResult};
use crate::AppState;

/// `POST /api/contact`
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> SiteResult<Json<Value>> {
    let form = form.validate().map_err(SiteError::Validation)?;

    let mailer = state
        .mailer
        .as_ref()
        .ok_or_else(|| SiteError::Unavailable("contact email is not configured".into()))?;

    let message = EmailMessage::from_contact(&form, &state.config.email.from, &state.config.email.to);
    let id = mailer.send(&message).await?;

    info!(message_id = %id, "Contact form delivered");
    Ok(Json(json!({ "success": true })))
}
