//! # Domain Types
//!
//! Core domain types used throughout the Designo site.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Slide       │   │   MediaAsset    │   │   MediaPage     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  key (stable)   │◄──│  public_id      │◄──│  assets         │       │
//! │  │  source         │   │  secure_url     │   │  next_cursor    │       │
//! │  │  alt            │   │  kind, w × h    │   │  total_count    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │  SlideSource    │   │    Category     │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  desktop        │   │  weddings       │                             │
//! │  │  mobile (opt)   │   │  christening    │                             │
//! │  └─────────────────┘   │  newborn        │                             │
//! │                        │  cake_smash_... │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Slides are tracked by [`SlideKey`], never by position. A media asset's
//! `public_id` doubles as its slide key, so a slide built from an asset keeps
//! its identity when the collection is reordered or extended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::CoreError;

// =============================================================================
// Slide Key
// =============================================================================

/// Stable identity of a slide across reorderings and appends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SlideKey(String);

impl SlideKey {
    /// Creates a key from any string-like value.
    pub fn new(key: impl Into<String>) -> Self {
        SlideKey(key.into())
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlideKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlideKey {
    fn from(value: &str) -> Self {
        SlideKey::new(value)
    }
}

// =============================================================================
// Slide
// =============================================================================

/// Responsive source reference for a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SlideSource {
    /// Source used on wide viewports (and on narrow ones without a mobile variant).
    pub desktop: String,

    /// Optional portrait crop used below the mobile breakpoint.
    pub mobile: Option<String>,
}

impl SlideSource {
    /// Picks the variant for a viewport width.
    ///
    /// The mobile variant wins only when the viewport is strictly narrower than
    /// the breakpoint *and* a mobile variant exists.
    pub fn for_viewport(&self, viewport_width: u32, mobile_breakpoint: u32) -> &str {
        match &self.mobile {
            Some(mobile) if viewport_width < mobile_breakpoint => mobile,
            _ => &self.desktop,
        }
    }
}

/// One displayable unit of a carousel.
///
/// Immutable once constructed; owned by the caller-provided collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Slide {
    /// Stable identity.
    pub key: SlideKey,

    /// Desktop/mobile sources.
    pub source: SlideSource,

    /// Alt text / display label.
    pub alt: String,
}

impl Slide {
    /// Creates a desktop-only slide.
    pub fn new(key: impl Into<String>, desktop: impl Into<String>, alt: impl Into<String>) -> Self {
        Slide {
            key: SlideKey::new(key),
            source: SlideSource {
                desktop: desktop.into(),
                mobile: None,
            },
            alt: alt.into(),
        }
    }

    /// Adds a mobile variant.
    pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
        self.source.mobile = Some(mobile.into());
        self
    }

    /// Builds a slide from a media-store asset, keyed by its public id.
    pub fn from_asset(asset: &MediaAsset, alt: impl Into<String>) -> Self {
        Slide::new(asset.public_id.clone(), asset.secure_url.clone(), alt)
    }
}

// =============================================================================
// Media Kind
// =============================================================================

/// Kind of asset stored in the media service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Still image.
    #[default]
    Image,
    /// Video clip.
    Video,
    /// Anything else the service stores (documents, archives).
    Raw,
}

impl MediaKind {
    /// Path segment the media service uses for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Raw => "raw",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            "raw" => Ok(MediaKind::Raw),
            other => Err(CoreError::Validation(
                crate::error::ValidationError::NotAllowed {
                    field: format!("kind '{}'", other),
                    allowed: vec!["image".into(), "video".into(), "raw".into()],
                },
            )),
        }
    }
}

// =============================================================================
// Media Asset
// =============================================================================

/// Asset descriptor returned by the media store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MediaAsset {
    /// Stable id (`folder/name`).
    pub public_id: String,

    /// HTTPS delivery URL.
    pub secure_url: String,

    /// File format (`jpg`, `mp4`, ...).
    #[serde(default)]
    pub format: String,

    #[serde(default)]
    pub width: u32,

    #[serde(default)]
    pub height: u32,

    /// Image or video.
    #[serde(rename = "resource_type", default)]
    pub kind: MediaKind,

    /// Upload time; search results are sorted newest first on this.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// One page of a folder listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MediaPage {
    /// Assets, newest first.
    pub assets: Vec<MediaAsset>,

    /// Cursor for the next page; `None` when the folder is exhausted.
    pub next_cursor: Option<String>,

    /// Total number of assets in the folder, as reported by the service.
    pub total_count: usize,
}

impl MediaPage {
    /// Returns true if the service has more assets past this page.
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

// =============================================================================
// Category
// =============================================================================

/// A gallery category; each maps to one folder in the media store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Weddings,
    Christening,
    Newborn,
    CakeSmashBirthdays,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Category::Weddings,
        Category::Christening,
        Category::Newborn,
        Category::CakeSmashBirthdays,
    ];

    /// Folder name in the media store (also the translation key).
    pub fn folder(&self) -> &'static str {
        match self {
            Category::Weddings => "weddings",
            Category::Christening => "christening",
            Category::Newborn => "newborn",
            Category::CakeSmashBirthdays => "cake_smash_birthdays",
        }
    }

    /// Translation key of the category label (`categories.<folder>`).
    pub fn translation_key(&self) -> String {
        format!("categories.{}", self.folder())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder())
    }
}

impl std::str::FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folder = s.trim().trim_matches('/');
        Category::ALL
            .into_iter()
            .find(|c| c.folder() == folder)
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_for_viewport() {
        let slide = Slide::new("weddings", "/desktop.jpg", "Weddings").with_mobile("/mobile.jpg");
        assert_eq!(slide.source.for_viewport(375, 768), "/mobile.jpg");
        assert_eq!(slide.source.for_viewport(768, 768), "/desktop.jpg");
        assert_eq!(slide.source.for_viewport(1440, 768), "/desktop.jpg");

        let desktop_only = Slide::new("newborn", "/newborn.jpg", "Newborn");
        assert_eq!(desktop_only.source.for_viewport(375, 768), "/newborn.jpg");
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("weddings".parse::<Category>().unwrap(), Category::Weddings);
        assert_eq!(
            "cake_smash_birthdays".parse::<Category>().unwrap(),
            Category::CakeSmashBirthdays
        );
        assert_eq!("/newborn/".parse::<Category>().unwrap(), Category::Newborn);
        assert!("portraits".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_serde_matches_folder() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.folder()));
        }
    }

    #[test]
    fn test_media_asset_from_service_json() {
        let json = r#"{
            "public_id": "weddings/ana-ivan-01",
            "secure_url": "https://res.example.com/weddings/ana-ivan-01.jpg",
            "format": "jpg",
            "width": 1920,
            "height": 1280,
            "resource_type": "image",
            "created_at": "2024-05-18T10:15:00Z"
        }"#;
        let asset: MediaAsset = serde_json::from_str(json).unwrap();
        assert_eq!(asset.kind, MediaKind::Image);
        assert_eq!(asset.width, 1920);

        let slide = Slide::from_asset(&asset, "Ana & Ivan");
        assert_eq!(slide.key.as_str(), "weddings/ana-ivan-01");
    }

    #[test]
    fn test_media_kind_parsing() {
        assert_eq!("VIDEO".parse::<MediaKind>().unwrap(), MediaKind::Video);
        assert!("audio".parse::<MediaKind>().is_err());
    }
}
