//! # Gallery Browser
//!
//! Layers on-demand paging over the category rotator. Opening a category
//! suspends rotation and shows a static grid; closing it resumes rotation
//! from a clean state.
//!
//! ## Open / View More / Close
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Category "weddings" (batch 27, page 9)              │
//! │                                                                         │
//! │  toggle(weddings)                                                       │
//! │    ├── cached?        yes ──► show cache instantly, no command          │
//! │    ├── outstanding?   yes ──► wait for the in-flight fetch              │
//! │    └── otherwise      ──────► Fetch { token: 1, cursor: None, 27 }      │
//! │                                                                         │
//! │  fetch_completed(1, Ok(page))   cache = 27 assets, visible = 9          │
//! │  view_more()                    visible = 18  (no network)              │
//! │  view_more()                    visible = 27  (no network)              │
//! │  view_more()                    Fetch { token: 2, cursor: "c1", 27 }    │
//! │                                                                         │
//! │  toggle(weddings)               closed; rotator resumes from progress 0 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stale Responses
//! Every fetch carries a token. A completion is applied only if its token is
//! the outstanding one for its category **and** that category is still
//! selected; anything else is dropped.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::carousel::{Carousel, CarouselEvent};
use crate::error::{CoreError, CoreResult};
use crate::types::{Category, MediaAsset, MediaKind, MediaPage};
use crate::{DEFAULT_FETCH_BATCH, DEFAULT_PAGE_SIZE, MAX_RESULTS};

// =============================================================================
// Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryConfig {
    /// Items revealed per "view more".
    pub page_size: usize,
    /// Items requested per fetch.
    pub fetch_batch: usize,
    /// Categories that may be opened.
    pub categories: Vec<Category>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        GalleryConfig {
            page_size: DEFAULT_PAGE_SIZE,
            fetch_batch: DEFAULT_FETCH_BATCH,
            categories: Category::ALL.to_vec(),
        }
    }
}

impl GalleryConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.page_size == 0 {
            return Err(crate::error::ValidationError::Required {
                field: "page_size".into(),
            }
            .into());
        }
        if self.fetch_batch == 0 || self.fetch_batch > MAX_RESULTS {
            return Err(crate::error::ValidationError::InvalidFormat {
                field: "fetch_batch".into(),
                reason: format!("must be between 1 and {MAX_RESULTS}"),
            }
            .into());
        }
        if self.categories.is_empty() {
            return Err(crate::error::ValidationError::Required {
                field: "categories".into(),
            }
            .into());
        }
        Ok(())
    }
}

// =============================================================================
// Commands & Outcomes
// =============================================================================

/// A page fetch the I/O layer should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: u64,
    pub category: Category,
    pub cursor: Option<String>,
    pub limit: usize,
}

/// A delete the I/O layer should perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub public_id: String,
    pub kind: MediaKind,
}

/// Work the browser asks the outside world to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryCommand {
    Fetch(FetchRequest),
    Delete(DeleteRequest),
}

/// Typed failure of a remote fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchFailure {
    pub message: String,
    /// True if retrying may succeed (timeouts, 5xx, network).
    pub retryable: bool,
}

impl FetchFailure {
    pub fn new(message: impl Into<String>, retryable: bool) -> Self {
        FetchFailure {
            message: message.into(),
            retryable,
        }
    }
}

/// Result of a [`GalleryCommand`], fed back through [`GalleryBrowser::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryOutcome {
    Fetched {
        token: u64,
        result: Result<MediaPage, FetchFailure>,
    },
    Deleted {
        public_id: String,
        result: Result<(), String>,
    },
}

/// User-visible notice (inline error or transient toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GalleryNotice {
    FetchFailed {
        category: Category,
        message: String,
        retryable: bool,
    },
    Deleted {
        public_id: String,
    },
    DeleteFailed {
        public_id: String,
        message: String,
    },
}

/// Grid snapshot for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GalleryView {
    pub selected: Option<Category>,
    pub items: Vec<MediaAsset>,
    pub has_more: bool,
    pub loading: bool,
    pub notice: Option<GalleryNotice>,
}

// =============================================================================
// Category Cache
// =============================================================================

/// Everything fetched for one category during this page view.
#[derive(Debug, Clone, Default)]
pub struct CategoryCache {
    assets: Vec<MediaAsset>,
    visible: usize,
    next_cursor: Option<String>,
    total_count: usize,
}

impl CategoryCache {
    pub fn assets(&self) -> &[MediaAsset] {
        &self.assets
    }

    pub fn visible(&self) -> &[MediaAsset] {
        &self.assets[..self.visible.min(self.assets.len())]
    }

    /// Fetched but not yet revealed.
    pub fn hidden_count(&self) -> usize {
        self.assets.len().saturating_sub(self.visible)
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn has_more(&self) -> bool {
        self.hidden_count() > 0 || self.next_cursor.is_some()
    }

    fn append(&mut self, page: MediaPage, page_size: usize) {
        let known: HashSet<String> = self.assets.iter().map(|a| a.public_id.clone()).collect();
        self.assets.extend(
            page.assets
                .into_iter()
                .filter(|a| !known.contains(&a.public_id)),
        );
        self.visible = (self.visible + page_size).min(self.assets.len());
        self.next_cursor = page.next_cursor;
        self.total_count = page.total_count.max(self.assets.len());
    }

    fn remove(&mut self, public_id: &str) -> bool {
        let Some(index) = self.assets.iter().position(|a| a.public_id == public_id) else {
            return false;
        };
        self.assets.remove(index);
        if index < self.visible {
            self.visible -= 1;
        }
        self.total_count = self.total_count.saturating_sub(1);
        true
    }
}

// =============================================================================
// Gallery Browser
// =============================================================================

/// Last failed fetch of a category, kept until a retry or a later success.
#[derive(Debug, Clone)]
struct FailedFetch {
    request: FetchRequest,
    message: String,
    retryable: bool,
}

impl FailedFetch {
    fn notice(&self) -> GalleryNotice {
        GalleryNotice::FetchFailed {
            category: self.request.category,
            message: self.message.clone(),
            retryable: self.retryable,
        }
    }
}

/// Category rotator plus on-demand grid.
#[derive(Debug)]
pub struct GalleryBrowser {
    config: GalleryConfig,
    rotator: Carousel,
    selected: Option<Category>,
    caches: HashMap<Category, CategoryCache>,
    outstanding: HashMap<Category, FetchRequest>,
    failed: HashMap<Category, FailedFetch>,
    deleting: HashSet<String>,
    notice: Option<GalleryNotice>,
    next_token: u64,
}

impl GalleryBrowser {
    /// Wraps an already mounted category rotator.
    pub fn new(config: GalleryConfig, rotator: Carousel) -> Self {
        GalleryBrowser {
            config,
            rotator,
            selected: None,
            caches: HashMap::new(),
            outstanding: HashMap::new(),
            failed: HashMap::new(),
            deleting: HashSet::new(),
            notice: None,
            next_token: 1,
        }
    }

    // =========================================================================
    // Open / Close
    // =========================================================================

    /// Opens `category`, or closes it if it is already open.
    pub fn toggle(&mut self, category: Category, now: Instant) -> CoreResult<Option<GalleryCommand>> {
        if !self.config.categories.contains(&category) {
            return Err(CoreError::UnknownCategory(category.to_string()));
        }
        if self.selected == Some(category) {
            self.close(now);
            return Ok(None);
        }
        Ok(self.open(category))
    }

    fn open(&mut self, category: Category) -> Option<GalleryCommand> {
        debug!(%category, "category opened");
        self.selected = Some(category);
        self.rotator.suspend();

        // A fetch error belongs to the grid it was raised for.
        if matches!(self.notice, Some(GalleryNotice::FetchFailed { .. })) {
            self.notice = None;
        }
        if let Some(failed) = self.failed.get(&category) {
            self.notice = Some(failed.notice());
        }

        if self.caches.contains_key(&category) || self.outstanding.contains_key(&category) {
            return None;
        }
        Some(GalleryCommand::Fetch(self.issue_fetch(category, None)))
    }

    /// Closes the grid and restarts rotation from a clean state.
    pub fn close(&mut self, now: Instant) {
        if let Some(category) = self.selected.take() {
            debug!(%category, "category closed");
        }
        if matches!(self.notice, Some(GalleryNotice::FetchFailed { .. })) {
            self.notice = None;
        }
        self.rotator.resume_from_clean(now);
    }

    fn issue_fetch(&mut self, category: Category, cursor: Option<String>) -> FetchRequest {
        let request = FetchRequest {
            token: self.next_token,
            category,
            cursor,
            limit: self.config.fetch_batch,
        };
        self.next_token += 1;
        self.outstanding.insert(category, request.clone());
        request
    }

    // =========================================================================
    // Paging
    // =========================================================================

    /// Reveals the next page of cached items, or asks for more once the
    /// cache is exhausted and the store reports a further cursor.
    pub fn view_more(&mut self) -> Option<GalleryCommand> {
        let category = self.selected?;
        let page_size = self.config.page_size;
        let cache = self.caches.get_mut(&category)?;

        let hidden = cache.hidden_count();
        if hidden > 0 {
            cache.visible += hidden.min(page_size);
            return None;
        }

        let cursor = cache.next_cursor.clone()?;
        if self.outstanding.contains_key(&category) {
            return None;
        }
        Some(GalleryCommand::Fetch(self.issue_fetch(category, Some(cursor))))
    }

    /// Re-issues the last failed fetch of the selected category.
    pub fn retry(&mut self) -> Option<GalleryCommand> {
        let category = self.selected?;
        if self.outstanding.contains_key(&category) {
            return None;
        }
        let failed = self.failed.remove(&category)?;
        let cursor = failed.request.cursor;
        if matches!(self.notice, Some(GalleryNotice::FetchFailed { .. })) {
            self.notice = None;
        }
        Some(GalleryCommand::Fetch(self.issue_fetch(category, cursor)))
    }

    /// Applies a fetch result. Returns true if it changed the grid.
    pub fn fetch_completed(&mut self, token: u64, result: Result<MediaPage, FetchFailure>) -> bool {
        let Some(category) = self
            .outstanding
            .iter()
            .find(|(_, req)| req.token == token)
            .map(|(category, _)| *category)
        else {
            debug!(token, "fetch result for unknown token dropped");
            return false;
        };
        let Some(request) = self.outstanding.remove(&category) else {
            return false;
        };

        if self.selected != Some(category) {
            debug!(token, %category, "stale fetch result discarded");
            return false;
        }

        match result {
            Ok(page) => {
                let fetched = page.assets.len();
                let page_size = self.config.page_size;
                self.caches
                    .entry(category)
                    .or_default()
                    .append(page, page_size);
                if matches!(&self.notice, Some(GalleryNotice::FetchFailed { category: c, .. }) if *c == category)
                {
                    self.notice = None;
                }
                self.failed.remove(&category);
                info!(%category, fetched, "gallery page loaded");
            }
            Err(failure) => {
                warn!(%category, error = %failure, "gallery fetch failed");
                let failed = FailedFetch {
                    request,
                    message: failure.message,
                    retryable: failure.retryable,
                };
                self.notice = Some(failed.notice());
                self.failed.insert(category, failed);
            }
        }
        true
    }

    // =========================================================================
    // Deletes
    // =========================================================================

    /// Asks to delete a cached asset. Only signed-in users may delete.
    pub fn request_delete(&mut self, public_id: &str, signed_in: bool) -> CoreResult<GalleryCommand> {
        if !signed_in {
            return Err(CoreError::NotSignedIn {
                action: "delete media".into(),
            });
        }
        let kind = self
            .caches
            .values()
            .flat_map(|cache| cache.assets.iter())
            .find(|asset| asset.public_id == public_id)
            .map(|asset| asset.kind)
            .ok_or_else(|| CoreError::AssetNotFound(public_id.to_string()))?;

        if !self.deleting.insert(public_id.to_string()) {
            return Err(CoreError::DeleteInProgress(public_id.to_string()));
        }
        Ok(GalleryCommand::Delete(DeleteRequest {
            public_id: public_id.to_string(),
            kind,
        }))
    }

    /// Applies a delete result. The asset leaves the cache only on success.
    pub fn delete_completed(&mut self, public_id: &str, result: Result<(), String>) {
        self.deleting.remove(public_id);
        match result {
            Ok(()) => {
                for cache in self.caches.values_mut() {
                    cache.remove(public_id);
                }
                info!(public_id, "asset deleted");
                self.notice = Some(GalleryNotice::Deleted {
                    public_id: public_id.to_string(),
                });
            }
            Err(message) => {
                warn!(public_id, error = %message, "asset delete failed");
                self.notice = Some(GalleryNotice::DeleteFailed {
                    public_id: public_id.to_string(),
                    message,
                });
            }
        }
    }

    /// Feeds back the result of any command.
    pub fn apply(&mut self, outcome: GalleryOutcome) {
        match outcome {
            GalleryOutcome::Fetched { token, result } => {
                self.fetch_completed(token, result);
            }
            GalleryOutcome::Deleted { public_id, result } => {
                self.delete_completed(&public_id, result);
            }
        }
    }

    // =========================================================================
    // Rotator passthrough
    // =========================================================================

    /// Advances the category rotator (suspended while a category is open).
    pub fn tick(&mut self, now: Instant) -> Vec<CarouselEvent> {
        self.rotator.tick(now)
    }

    pub fn rotator(&self) -> &Carousel {
        &self.rotator
    }

    pub fn rotator_mut(&mut self) -> &mut Carousel {
        &mut self.rotator
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn selected(&self) -> Option<Category> {
        self.selected
    }

    pub fn cache(&self, category: Category) -> Option<&CategoryCache> {
        self.caches.get(&category)
    }

    /// Items currently shown in the grid.
    pub fn visible_items(&self) -> &[MediaAsset] {
        self.selected
            .and_then(|c| self.caches.get(&c))
            .map(CategoryCache::visible)
            .unwrap_or(&[])
    }

    pub fn has_more(&self) -> bool {
        self.selected
            .and_then(|c| self.caches.get(&c))
            .is_some_and(CategoryCache::has_more)
    }

    /// True while a fetch for the selected category is in flight.
    pub fn is_loading(&self) -> bool {
        self.selected
            .is_some_and(|c| self.outstanding.contains_key(&c))
    }

    pub fn is_deleting(&self, public_id: &str) -> bool {
        self.deleting.contains(public_id)
    }

    pub fn notice(&self) -> Option<&GalleryNotice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn view(&self) -> GalleryView {
        GalleryView {
            selected: self.selected,
            items: self.visible_items().to_vec(),
            has_more: self.has_more(),
            loading: self.is_loading(),
            notice: self.notice.clone(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::CarouselConfig;
    use crate::types::Slide;
    use chrono::DateTime;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn asset(folder: &str, n: usize) -> MediaAsset {
        MediaAsset {
            public_id: format!("{folder}/{n:03}"),
            secure_url: format!("https://res.example.com/{folder}/{n:03}.jpg"),
            format: "jpg".into(),
            width: 1600,
            height: 1067,
            kind: MediaKind::Image,
            created_at: DateTime::from_timestamp(1_700_000_000 - n as i64, 0).unwrap(),
        }
    }

    fn page(folder: &str, range: std::ops::Range<usize>, cursor: Option<&str>) -> MediaPage {
        MediaPage {
            assets: range.map(|n| asset(folder, n)).collect(),
            next_cursor: cursor.map(String::from),
            total_count: 60,
        }
    }

    fn browser(t0: Instant) -> GalleryBrowser {
        let slides = Category::ALL
            .iter()
            .map(|c| Slide::new(c.folder(), format!("/{}.jpg", c.folder()), c.folder()))
            .collect();
        let mut rotator = Carousel::new(CarouselConfig::default());
        rotator.mount(slides, t0, &mut StdRng::seed_from_u64(3));
        GalleryBrowser::new(GalleryConfig::default(), rotator)
    }

    fn fetch_of(command: Option<GalleryCommand>) -> FetchRequest {
        match command {
            Some(GalleryCommand::Fetch(request)) => request,
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn test_open_fetches_once_and_pages_from_cache() {
        let t0 = Instant::now();
        let mut gallery = browser(t0);

        let request = fetch_of(gallery.toggle(Category::Weddings, t0).unwrap());
        assert_eq!(request.cursor, None);
        assert_eq!(request.limit, DEFAULT_FETCH_BATCH);
        assert!(gallery.is_loading());

        assert!(gallery.fetch_completed(request.token, Ok(page("weddings", 0..27, Some("c1")))));
        assert_eq!(gallery.visible_items().len(), 9);
        assert!(gallery.has_more());

        assert_eq!(gallery.view_more(), None);
        assert_eq!(gallery.visible_items().len(), 18);
        assert_eq!(gallery.view_more(), None);
        assert_eq!(gallery.visible_items().len(), 27);

        let more = fetch_of(gallery.view_more());
        assert_eq!(more.cursor.as_deref(), Some("c1"));

        gallery.fetch_completed(more.token, Ok(page("weddings", 27..40, None)));
        // First nine of the new batch shown; the rest wait for "view more".
        assert_eq!(gallery.visible_items().len(), 36);
        assert_eq!(gallery.visible_items()[0].public_id, "weddings/000");
        assert_eq!(gallery.view_more(), None);
        assert_eq!(gallery.visible_items().len(), 40);
        assert!(!gallery.has_more());
        assert_eq!(gallery.view_more(), None);
    }

    #[test]
    fn test_open_suspends_and_close_resumes_clean() {
        let t0 = Instant::now();
        let mut gallery = browser(t0);
        gallery.tick(t0 + Duration::from_millis(2_000));

        gallery.toggle(Category::Newborn, t0 + Duration::from_millis(2_000)).unwrap();
        assert!(gallery.rotator().is_suspended());
        assert!(gallery.tick(t0 + Duration::from_millis(60_000)).is_empty());

        gallery.toggle(Category::Newborn, t0 + Duration::from_millis(60_000)).unwrap();
        assert_eq!(gallery.selected(), None);
        assert!(!gallery.rotator().is_paused());
        assert_eq!(gallery.rotator().progress(), 0.0);
    }

    #[test]
    fn test_reopen_uses_cache() {
        let t0 = Instant::now();
        let mut gallery = browser(t0);

        let request = fetch_of(gallery.toggle(Category::Christening, t0).unwrap());
        gallery.fetch_completed(request.token, Ok(page("christening", 0..5, None)));
        gallery.toggle(Category::Christening, t0).unwrap();

        assert_eq!(gallery.toggle(Category::Christening, t0).unwrap(), None);
        assert_eq!(gallery.visible_items().len(), 5);
        assert!(!gallery.is_loading());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let t0 = Instant::now();
        let mut gallery = browser(t0);

        let weddings = fetch_of(gallery.toggle(Category::Weddings, t0).unwrap());
        let newborn = fetch_of(gallery.toggle(Category::Newborn, t0).unwrap());

        assert!(!gallery.fetch_completed(weddings.token, Ok(page("weddings", 0..9, None))));
        assert!(gallery.cache(Category::Weddings).is_none());

        assert!(gallery.fetch_completed(newborn.token, Ok(page("newborn", 0..4, None))));
        assert_eq!(gallery.visible_items().len(), 4);

        // Unknown or replayed tokens are ignored too.
        assert!(!gallery.fetch_completed(newborn.token, Ok(page("newborn", 0..9, None))));
        assert_eq!(gallery.visible_items().len(), 4);
    }

    #[test]
    fn test_rapid_toggle_keeps_single_outstanding_fetch() {
        let t0 = Instant::now();
        let mut gallery = browser(t0);

        let first = fetch_of(gallery.toggle(Category::Weddings, t0).unwrap());
        gallery.toggle(Category::Weddings, t0).unwrap();
        // Reopening while the first request is still out issues nothing new.
        assert_eq!(gallery.toggle(Category::Weddings, t0).unwrap(), None);

        assert!(gallery.fetch_completed(first.token, Ok(page("weddings", 0..9, None))));
        assert_eq!(gallery.visible_items().len(), 9);
    }

    #[test]
    fn test_fetch_failure_and_retry() {
        let t0 = Instant::now();
        let mut gallery = browser(t0);

        let request = fetch_of(gallery.toggle(Category::Weddings, t0).unwrap());
        gallery.fetch_completed(request.token, Err(FetchFailure::new("timed out", true)));
        assert!(matches!(
            gallery.notice(),
            Some(GalleryNotice::FetchFailed { retryable: true, .. })
        ));
        assert!(gallery.visible_items().is_empty());

        let retry = fetch_of(gallery.retry());
        assert_ne!(retry.token, request.token);
        assert!(gallery.notice().is_none());
        assert_eq!(gallery.retry(), None);

        gallery.fetch_completed(retry.token, Ok(page("weddings", 0..3, None)));
        assert_eq!(gallery.visible_items().len(), 3);
    }

    #[test]
    fn test_fetch_failure_stays_with_its_category() {
        let t0 = Instant::now();
        let mut gallery = browser(t0);

        let newborn = fetch_of(gallery.toggle(Category::Newborn, t0).unwrap());
        gallery.fetch_completed(newborn.token, Ok(page("newborn", 0..4, None)));

        let weddings = fetch_of(gallery.toggle(Category::Weddings, t0).unwrap());
        gallery.fetch_completed(weddings.token, Err(FetchFailure::new("timed out", true)));
        assert!(gallery.notice().is_some());

        // Another grid shows neither the error nor a retry.
        assert_eq!(gallery.toggle(Category::Newborn, t0).unwrap(), None);
        assert_eq!(gallery.notice(), None);
        assert_eq!(gallery.view().notice, None);
        assert_eq!(gallery.retry(), None);

        // Back on weddings the error returns and retry works.
        assert_eq!(gallery.toggle(Category::Weddings, t0).unwrap(), None);
        assert_eq!(
            gallery.notice(),
            Some(&GalleryNotice::FetchFailed {
                category: Category::Weddings,
                message: "timed out".into(),
                retryable: true,
            })
        );
        let retry = fetch_of(gallery.retry());
        assert_eq!(retry.category, Category::Weddings);
        assert_eq!(retry.cursor, None);
        assert_eq!(gallery.notice(), None);

        // Closing also clears a fetch error.
        gallery.fetch_completed(retry.token, Err(FetchFailure::new("boom", true)));
        gallery.toggle(Category::Weddings, t0).unwrap();
        assert_eq!(gallery.notice(), None);
    }

    #[test]
    fn test_delete_requires_sign_in() {
        let t0 = Instant::now();
        let mut gallery = browser(t0);
        let request = fetch_of(gallery.toggle(Category::Weddings, t0).unwrap());
        gallery.fetch_completed(request.token, Ok(page("weddings", 0..3, None)));

        assert!(matches!(
            gallery.request_delete("weddings/001", false),
            Err(CoreError::NotSignedIn { .. })
        ));
        assert!(matches!(
            gallery.request_delete("weddings/999", true),
            Err(CoreError::AssetNotFound(_))
        ));
    }

    #[test]
    fn test_delete_success_removes_from_cache() {
        let t0 = Instant::now();
        let mut gallery = browser(t0);
        let request = fetch_of(gallery.toggle(Category::Weddings, t0).unwrap());
        gallery.fetch_completed(request.token, Ok(page("weddings", 0..12, None)));

        let command = gallery.request_delete("weddings/001", true).unwrap();
        assert_eq!(
            command,
            GalleryCommand::Delete(DeleteRequest {
                public_id: "weddings/001".into(),
                kind: MediaKind::Image
            })
        );
        assert!(matches!(
            gallery.request_delete("weddings/001", true),
            Err(CoreError::DeleteInProgress(_))
        ));

        gallery.delete_completed("weddings/001", Ok(()));
        assert_eq!(gallery.visible_items().len(), 8);
        assert!(gallery
            .visible_items()
            .iter()
            .all(|a| a.public_id != "weddings/001"));
        assert_eq!(gallery.cache(Category::Weddings).unwrap().assets().len(), 11);
    }

    #[test]
    fn test_delete_failure_keeps_item() {
        let t0 = Instant::now();
        let mut gallery = browser(t0);
        let request = fetch_of(gallery.toggle(Category::Weddings, t0).unwrap());
        gallery.fetch_completed(request.token, Ok(page("weddings", 0..9, None)));

        gallery.request_delete("weddings/004", true).unwrap();
        gallery.apply(GalleryOutcome::Deleted {
            public_id: "weddings/004".into(),
            result: Err("network unreachable".into()),
        });

        assert!(gallery
            .visible_items()
            .iter()
            .any(|a| a.public_id == "weddings/004"));
        assert!(matches!(
            gallery.notice(),
            Some(GalleryNotice::DeleteFailed { .. })
        ));
        assert!(!gallery.is_deleting("weddings/004"));

        gallery.dismiss_notice();
        assert!(gallery.view().notice.is_none());
    }

    #[test]
    fn test_unknown_category_rejected() {
        let t0 = Instant::now();
        let slides = vec![Slide::new("weddings", "/w.jpg", "Weddings")];
        let mut rotator = Carousel::new(CarouselConfig::default());
        rotator.mount(slides, t0, &mut StdRng::seed_from_u64(0));
        let config = GalleryConfig {
            categories: vec![Category::Weddings],
            ..GalleryConfig::default()
        };
        let mut gallery = GalleryBrowser::new(config, rotator);

        assert!(matches!(
            gallery.toggle(Category::Newborn, t0),
            Err(CoreError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_config_validation() {
        assert!(GalleryConfig::default().validate().is_ok());
        let config = GalleryConfig {
            fetch_batch: 500,
            ..GalleryConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
