//! # Media Store Port
//!
//! The site only needs four things from its media host: list a category
//! folder newest first, list folders, upload into a folder, destroy one asset.
//!
//! ```text
//!   GalleryService / HTTP handlers
//!               │
//!               ▼
//!     ┌──────────────────┐
//!     │  dyn MediaStore  │
//!     └────────┬─────────┘
//!        ┌─────┴──────────────┐
//!        ▼                    ▼
//!  CloudinaryClient      MemoryStore
//!  (production)          (no credentials / tests)
//! ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use designo_core::{Category, MediaAsset, MediaKind, MediaPage};

use crate::error::{MediaError, MediaResult};

/// A file received from the dashboard upload form.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadPayload {
    /// Resource kind implied by the MIME type.
    pub fn kind(&self) -> MediaKind {
        if self.content_type.starts_with("video/") {
            MediaKind::Video
        } else if self.content_type.starts_with("image/") {
            MediaKind::Image
        } else {
            MediaKind::Raw
        }
    }
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// One page of a category folder, newest first.
    async fn list_folder(
        &self,
        category: Category,
        limit: usize,
        cursor: Option<&str>,
    ) -> MediaResult<MediaPage>;

    /// Names of the top-level folders.
    async fn list_folders(&self) -> MediaResult<Vec<String>>;

    /// Uploads one file into a category folder.
    async fn upload(&self, category: Category, file: UploadPayload) -> MediaResult<MediaAsset>;

    /// Destroys one asset. Succeeds only when the host confirms.
    async fn delete(&self, public_id: &str, kind: MediaKind) -> MediaResult<()>;
}

// =============================================================================
// In-memory store
// =============================================================================

/// Process-local store. Served when no media credentials are configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    folders: RwLock<HashMap<Category, Vec<MediaAsset>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with assets.
    pub fn with_assets(assets: impl IntoIterator<Item = (Category, MediaAsset)>) -> Self {
        let mut folders: HashMap<Category, Vec<MediaAsset>> = HashMap::new();
        for (category, asset) in assets {
            folders.entry(category).or_default().push(asset);
        }
        MemoryStore {
            folders: RwLock::new(folders),
        }
    }
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn list_folder(
        &self,
        category: Category,
        limit: usize,
        cursor: Option<&str>,
    ) -> MediaResult<MediaPage> {
        let offset = match cursor {
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| MediaError::Rejected {
                    status: 400,
                    message: format!("invalid cursor: {}", c),
                })?,
            None => 0,
        };

        let folders = self.folders.read().await;
        let mut assets = folders.get(&category).cloned().unwrap_or_default();
        assets.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total_count = assets.len();
        let page: Vec<MediaAsset> = assets.into_iter().skip(offset).take(limit).collect();
        let end = offset + page.len();

        Ok(MediaPage {
            assets: page,
            next_cursor: (end < total_count).then(|| end.to_string()),
            total_count,
        })
    }

    async fn list_folders(&self) -> MediaResult<Vec<String>> {
        Ok(Category::ALL.iter().map(|c| c.folder().to_string()).collect())
    }

    async fn upload(&self, category: Category, file: UploadPayload) -> MediaResult<MediaAsset> {
        let stem = file
            .file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&file.file_name);
        let format = file
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        let public_id = format!("{}/{}_{}", category.folder(), stem, uuid::Uuid::new_v4().simple());

        let asset = MediaAsset {
            secure_url: format!("memory://{}", public_id),
            public_id,
            format,
            width: 0,
            height: 0,
            kind: file.kind(),
            created_at: Utc::now(),
        };

        debug!(public_id = %asset.public_id, bytes = file.bytes.len(), "Stored upload in memory");
        self.folders
            .write()
            .await
            .entry(category)
            .or_default()
            .push(asset.clone());
        Ok(asset)
    }

    async fn delete(&self, public_id: &str, _kind: MediaKind) -> MediaResult<()> {
        let mut folders = self.folders.write().await;
        for assets in folders.values_mut() {
            if let Some(pos) = assets.iter().position(|a| a.public_id == public_id) {
                assets.remove(pos);
                return Ok(());
            }
        }
        Err(MediaError::DeleteFailed {
            public_id: public_id.to_string(),
            result: "not found".into(),
        })
    }
}
