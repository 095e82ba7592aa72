//! # designo-media: External Services for the Designo Site
//!
//! Everything that leaves the process: the hosted media library, outgoing
//! email, session verification, translation files on disk and the tokio
//! clock that drives carousels.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Media Layer Architecture                         │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 SiteConfig (defaults → TOML → env)               │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ MediaStore     │  │ Mailer         │  │ IdentityProvider       │    │
//! │  │                │  │                │  │                        │    │
//! │  │ Cloudinary or  │  │ Resend         │  │ JWT session tokens     │    │
//! │  │ in-memory      │  │ contact emails │  │ or always signed out   │    │
//! │  └───────┬────────┘  └────────────────┘  └────────────────────────┘    │
//! │          │                                                              │
//! │          ▼                                                              │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ GalleryService │  │ Translation-   │  │ CarouselDriver         │    │
//! │  │                │  │ Store          │  │                        │    │
//! │  │ GalleryCommand │  │ <locale>/      │  │ frame loop feeding     │    │
//! │  │ → Outcome,     │  │ common.json    │  │ Carousel::tick         │    │
//! │  │ 5 s timeout    │  │ with fallback  │  │                        │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Site configuration (TOML file + environment)
//! - [`error`] - Media error types
//! - [`store`] - `MediaStore` port and the in-memory store
//! - [`cloudinary`] - Cloudinary REST client
//! - [`email`] - `Mailer` port and the Resend client
//! - [`identity`] - Session token verification
//! - [`translations`] - Translation bundles on disk
//! - [`gallery_service`] - Executes gallery commands against a store
//! - [`driver`] - Tokio frame loop for a carousel
//!
//! ## Usage
//!
//! ```rust,ignore
//! use designo_media::{CloudinaryClient, GalleryService, SiteConfig};
//!
//! let config = SiteConfig::load_or_default(None);
//! let store = Arc::new(CloudinaryClient::new(&config.media)?);
//! let gallery = GalleryService::new(store, config.gallery.fetch_timeout());
//!
//! let page = gallery.fetch_page(Category::Weddings, None, 27).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cloudinary;
pub mod config;
pub mod driver;
pub mod email;
pub mod error;
pub mod gallery_service;
pub mod identity;
pub mod store;
pub mod translations;

// =============================================================================
// Re-exports
// =============================================================================

pub use cloudinary::CloudinaryClient;
pub use config::{
    AuthSettings, CarouselSettings, EmailSettings, GallerySettings, LocaleSettings, MediaSettings,
    ServerSettings, SiteConfig, TokenAlgorithm,
};
pub use driver::{CarouselCommand, CarouselDriver, CarouselHandle};
pub use email::{EmailMessage, Mailer, ResendMailer};
pub use error::{MediaError, MediaResult};
pub use gallery_service::GalleryService;
pub use identity::{IdentityProvider, JwtIdentity, SignedOut, User};
pub use store::{MediaStore, MemoryStore, UploadPayload};
pub use translations::{TranslationStore, Translations};
