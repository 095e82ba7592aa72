//! # Gallery Service
//!
//! Executes the commands a [`GalleryBrowser`](designo_core::GalleryBrowser)
//! emits against a [`MediaStore`] and turns the results into outcomes the
//! browser can apply.
//!
//! ```text
//!   GalleryBrowser ──GalleryCommand──► GalleryService ──► dyn MediaStore
//!         ▲                                  │
//!         └──────────GalleryOutcome──────────┘
//!                (timeouts become retryable FetchFailures)
//! ```

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use designo_core::{
    Category, DeleteRequest, FetchFailure, FetchRequest, GalleryCommand, GalleryOutcome, MediaPage,
};

use crate::error::MediaError;
use crate::store::MediaStore;

pub struct GalleryService {
    store: Arc<dyn MediaStore>,
    fetch_timeout: Duration,
}

impl GalleryService {
    pub fn new(store: Arc<dyn MediaStore>, fetch_timeout: Duration) -> Self {
        GalleryService {
            store,
            fetch_timeout,
        }
    }

    pub fn store(&self) -> &Arc<dyn MediaStore> {
        &self.store
    }

    /// One page of a category, bounded by the fetch timeout.
    pub async fn fetch_page(
        &self,
        category: Category,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<MediaPage, FetchFailure> {
        let call = self.store.list_folder(category, limit, cursor);
        match tokio::time::timeout(self.fetch_timeout, call).await {
            Ok(Ok(page)) => Ok(page),
            Ok(Err(e)) => {
                warn!(%category, "Gallery fetch failed: {}", e);
                Err(failure(&e))
            }
            Err(_) => {
                warn!(%category, timeout = ?self.fetch_timeout, "Gallery fetch timed out");
                Err(FetchFailure::new(
                    format!("request timed out after {} s", self.fetch_timeout.as_secs()),
                    true,
                ))
            }
        }
    }

    pub async fn fetch(&self, request: &FetchRequest) -> Result<MediaPage, FetchFailure> {
        self.fetch_page(request.category, request.cursor.as_deref(), request.limit)
            .await
    }

    pub async fn delete(&self, request: &DeleteRequest) -> Result<(), String> {
        match self.store.delete(&request.public_id, request.kind).await {
            Ok(()) => {
                info!(public_id = %request.public_id, "Gallery item deleted");
                Ok(())
            }
            Err(e) => {
                warn!(public_id = %request.public_id, "Gallery delete failed: {}", e);
                Err(e.to_string())
            }
        }
    }

    /// Runs one command to completion.
    pub async fn execute(&self, command: GalleryCommand) -> GalleryOutcome {
        match command {
            GalleryCommand::Fetch(request) => GalleryOutcome::Fetched {
                token: request.token,
                result: self.fetch(&request).await,
            },
            GalleryCommand::Delete(request) => GalleryOutcome::Deleted {
                result: self.delete(&request).await,
                public_id: request.public_id,
            },
        }
    }
}

fn failure(err: &MediaError) -> FetchFailure {
    FetchFailure::new(err.to_string(), err.is_retryable())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use designo_core::{CarouselConfig, GalleryBrowser, GalleryConfig, MediaAsset, MediaKind, Slide};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Instant;

    use crate::error::MediaResult;
    use crate::store::{MemoryStore, UploadPayload};

    /// Store whose search never answers in time.
    struct SlowStore;

    #[async_trait]
    impl MediaStore for SlowStore {
        async fn list_folder(&self, _: Category, _: usize, _: Option<&str>) -> MediaResult<MediaPage> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(MediaPage::default())
        }
        async fn list_folders(&self) -> MediaResult<Vec<String>> {
            Ok(Vec::new())
        }
        async fn upload(&self, _: Category, _: UploadPayload) -> MediaResult<MediaAsset> {
            Err(MediaError::ServiceUnavailable("read-only".into()))
        }
        async fn delete(&self, public_id: &str, _: MediaKind) -> MediaResult<()> {
            Err(MediaError::DeleteFailed {
                public_id: public_id.into(),
                result: "error".into(),
            })
        }
    }

    fn asset(n: usize) -> MediaAsset {
        MediaAsset {
            public_id: format!("weddings/{n:03}"),
            secure_url: format!("https://res.example.com/weddings/{n:03}.jpg"),
            format: "jpg".into(),
            width: 1200,
            height: 800,
            kind: MediaKind::Image,
            created_at: chrono::Utc::now() - chrono::Duration::seconds(n as i64),
        }
    }

    fn browser() -> GalleryBrowser {
        let slides = Category::ALL
            .iter()
            .map(|c| Slide::new(c.folder(), format!("/{}.jpg", c.folder()), c.folder()))
            .collect();
        let mut rotator = designo_core::Carousel::new(CarouselConfig::default());
        rotator.mount(slides, Instant::now(), &mut StdRng::seed_from_u64(3));
        GalleryBrowser::new(GalleryConfig::default(), rotator)
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_retryable_failure() {
        let service = GalleryService::new(Arc::new(SlowStore), Duration::from_secs(5));
        let failure = service
            .fetch_page(Category::Weddings, None, 27)
            .await
            .unwrap_err();
        assert!(failure.retryable);
        assert!(failure.message.contains("timed out"));
    }

    #[tokio::test]
    async fn test_browser_round_trip_through_store() {
        let store = Arc::new(MemoryStore::with_assets(
            (0..12).map(|n| (Category::Weddings, asset(n))),
        ));
        let service = GalleryService::new(store, Duration::from_secs(5));
        let mut browser = browser();

        let command = browser
            .toggle(Category::Weddings, Instant::now())
            .unwrap()
            .unwrap();
        browser.apply(service.execute(command).await);

        let view = browser.view();
        assert_eq!(view.items.len(), 9);
        assert_eq!(view.items[0].public_id, "weddings/000");
        assert!(view.has_more);

        let delete = browser.request_delete("weddings/000", true).unwrap();
        browser.apply(service.execute(delete).await);
        assert!(browser
            .visible_items()
            .iter()
            .all(|a| a.public_id != "weddings/000"));
    }

    #[tokio::test]
    async fn test_delete_failure_is_reported() {
        let service = GalleryService::new(Arc::new(SlowStore), Duration::from_secs(5));
        let outcome = service
            .execute(GalleryCommand::Delete(DeleteRequest {
                public_id: "weddings/001".into(),
                kind: MediaKind::Image,
            }))
            .await;
        assert!(matches!(
            outcome,
            GalleryOutcome::Deleted { result: Err(_), .. }
        ));
    }
}
