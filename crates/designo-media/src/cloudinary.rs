//! # Cloudinary Client
//!
//! [`MediaStore`] implementation over the Cloudinary REST API.
//!
//! ## Request Types
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Admin API (HTTP basic auth: api_key / api_secret)                      │
//! │    POST {base}/{cloud}/resources/search   folder:<name>, newest first   │
//! │    GET  {base}/{cloud}/folders                                          │
//! │                                                                         │
//! │  Upload API (signed form: sha256(params + secret))                      │
//! │    POST {base}/{cloud}/auto/upload        multipart, folder=<name>      │
//! │    POST {base}/{cloud}/{kind}/destroy     public_id, result == "ok"     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use designo_core::{Category, MediaAsset, MediaKind, MediaPage};

use crate::config::MediaSettings;
use crate::error::{MediaError, MediaResult};
use crate::store::{MediaStore, UploadPayload};

/// Retry-After fallback when the header is missing.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    resources: Vec<MediaAsset>,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    total_count: usize,
}

#[derive(Debug, Deserialize)]
struct FoldersResponse {
    #[serde(default)]
    folders: Vec<FolderEntry>,
}

#[derive(Debug, Deserialize)]
struct FolderEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

// =============================================================================
// Signing
// =============================================================================

/// Signature over request parameters.
///
/// Parameters are sorted by name, joined as `k=v&k=v`, suffixed with the
/// secret and hashed with SHA-256.
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

// =============================================================================
// Client
// =============================================================================

pub struct CloudinaryClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    api_secret: String,
    max_results: usize,
}

impl CloudinaryClient {
    /// Creates a client. Every credential must be present.
    pub fn new(settings: &MediaSettings) -> MediaResult<Self> {
        if settings.cloud_name.is_empty() {
            return Err(MediaError::MissingCredential("CLOUDINARY_CLOUD_NAME".into()));
        }
        if settings.api_key.is_empty() {
            return Err(MediaError::MissingCredential("CLOUDINARY_API_KEY".into()));
        }
        if settings.api_secret.is_empty() {
            return Err(MediaError::MissingCredential("CLOUDINARY_API_SECRET".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| MediaError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/{}",
                settings.api_base_url.trim_end_matches('/'),
                settings.cloud_name
            ),
            api_key: settings.api_key.clone(),
            api_secret: settings.api_secret.clone(),
            max_results: settings.max_results,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Signed form fields for the upload API.
    fn signed_form(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        params.push(("timestamp", chrono::Utc::now().timestamp().to_string()));
        let signature = sign_params(&params, &self.api_secret);
        params.push(("api_key", self.api_key.clone()));
        params.push(("signature", signature));
        params.push(("signature_algorithm", "sha256".to_string()));
        params
    }

    /// Maps non-success answers to errors.
    async fn check_response(&self, resp: reqwest::Response) -> MediaResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let retry_after = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

        let text = resp.text().await.unwrap_or_else(|e| {
            warn!("Failed to read error body: {e}");
            String::new()
        });
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.error.message)
            .unwrap_or(text);

        match status.as_u16() {
            401 | 403 => Err(MediaError::Unauthorized(message)),
            404 => Err(MediaError::NotFound(message)),
            420 | 429 => Err(MediaError::RateLimited {
                retry_after_secs: retry_after,
            }),
            500..=599 => Err(MediaError::ServiceUnavailable(message)),
            code => Err(MediaError::Rejected {
                status: code,
                message,
            }),
        }
    }
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    async fn list_folder(
        &self,
        category: Category,
        limit: usize,
        cursor: Option<&str>,
    ) -> MediaResult<MediaPage> {
        let mut body = serde_json::json!({
            "expression": format!("folder:{}", category.folder()),
            "sort_by": [{ "created_at": "desc" }],
            "max_results": limit.clamp(1, self.max_results),
        });
        if let Some(cursor) = cursor {
            body["next_cursor"] = serde_json::Value::String(cursor.to_string());
        }

        debug!(folder = category.folder(), limit, ?cursor, "Searching media folder");
        let resp = self
            .client
            .post(self.url("/resources/search"))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .json(&body)
            .send()
            .await?;
        let resp = self.check_response(resp).await?;
        let search: SearchResponse = resp.json().await?;

        Ok(MediaPage {
            assets: search.resources,
            next_cursor: search.next_cursor,
            total_count: search.total_count,
        })
    }

    async fn list_folders(&self) -> MediaResult<Vec<String>> {
        let resp = self
            .client
            .get(self.url("/folders"))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .send()
            .await?;
        let resp = self.check_response(resp).await?;
        let folders: FoldersResponse = resp.json().await?;
        Ok(folders.folders.into_iter().map(|f| f.name).collect())
    }

    async fn upload(&self, category: Category, file: UploadPayload) -> MediaResult<MediaAsset> {
        let size = file.bytes.len();
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| MediaError::Rejected {
                status: 400,
                message: format!("invalid content type: {}", e),
            })?;

        let mut form = reqwest::multipart::Form::new().part("file", part);
        for (key, value) in self.signed_form(vec![("folder", category.folder().to_string())]) {
            form = form.text(key, value);
        }

        let resp = self
            .client
            .post(self.url("/auto/upload"))
            .multipart(form)
            .send()
            .await?;
        let resp = self.check_response(resp).await?;
        let asset: MediaAsset = resp.json().await?;

        info!(public_id = %asset.public_id, size, "Uploaded media asset");
        Ok(asset)
    }

    async fn delete(&self, public_id: &str, kind: MediaKind) -> MediaResult<()> {
        let form = self.signed_form(vec![("public_id", public_id.to_string())]);

        let resp = self
            .client
            .post(self.url(&format!("/{}/destroy", kind.as_str())))
            .form(&form)
            .send()
            .await?;
        let resp = self.check_response(resp).await?;
        let destroy: DestroyResponse = resp.json().await?;

        if destroy.result == "ok" {
            info!(public_id, "Deleted media asset");
            Ok(())
        } else {
            warn!(public_id, result = %destroy.result, "Media host refused delete");
            Err(MediaError::DeleteFailed {
                public_id: public_id.to_string(),
                result: destroy.result,
            })
        }
    }
}
