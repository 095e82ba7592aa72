//! Contact-form email delivery over the Resend HTTP API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use designo_core::ContactForm;

use crate::config::EmailSettings;
use crate::error::{MediaError, MediaResult};

/// Outgoing plain-text email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
}

impl EmailMessage {
    /// Studio notification for a validated contact submission.
    pub fn from_contact(form: &ContactForm, from: &str, to: &str) -> Self {
        EmailMessage {
            from: from.to_string(),
            to: vec![to.to_string()],
            subject: format!("Nova prijava obrasca od {}", form.name),
            text: format!(
                "Ime: {}\nE-mail: {}\nPoruka: {}\n",
                form.name, form.email, form.message
            ),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends one message, returning the provider's message id.
    async fn send(&self, message: &EmailMessage) -> MediaResult<String>;
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

pub struct ResendMailer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ResendMailer {
    pub fn new(settings: &EmailSettings) -> MediaResult<Self> {
        if settings.api_key.is_empty() {
            return Err(MediaError::MissingCredential("RESEND_API_KEY".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| MediaError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> MediaResult<String> {
        let idempotency_key = uuid::Uuid::new_v4().to_string();
        debug!(subject = %message.subject, %idempotency_key, "Sending email");

        let resp = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Idempotency-Key", &idempotency_key)
            .json(message)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => MediaError::Unauthorized(text),
                429 => MediaError::RateLimited {
                    retry_after_secs: 1,
                },
                500..=599 => MediaError::ServiceUnavailable(text),
                code => MediaError::Rejected {
                    status: code,
                    message: text,
                },
            });
        }

        let sent: SendResponse = resp.json().await?;
        info!(id = %sent.id, "Email accepted");
        Ok(sent.id)
    }
}
