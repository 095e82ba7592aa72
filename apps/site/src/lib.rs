//! # Designo Site
//!
//! JSON API behind the studio website.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Site Routes                                   │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  /api/gallery  │  │  /api/contact  │  │  /api/me                   ││
//! │  │                │  │                │  │                            ││
//! │  │ • GET page     │  │ • validate     │  │ • session → user           ││
//! │  │ • DELETE item  │  │ • send email   │  │ • time-of-day greeting     ││
//! │  │ • POST upload  │  │                │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │ /{lang}/       │  │ robots.txt     │  │ fallback                   ││
//! │  │ translations   │  │ sitemap.xml    │  │                            ││
//! │  │                │  │ manifest       │  │ 307 → /{negotiated}/path   ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`designo_media::SiteConfig`]. Without media credentials the site
//! serves an empty in-memory library; without an auth key nobody can sign in;
//! without an email key the contact form answers 503.

pub mod error;
pub mod handlers;
pub mod routes;

use std::sync::Arc;
use tracing::warn;

use designo_media::{
    CloudinaryClient, GalleryService, IdentityProvider, JwtIdentity, Mailer, MediaStore,
    MemoryStore, ResendMailer, SignedOut, SiteConfig, TranslationStore,
};

pub use error::{SiteError, SiteResult};
pub use routes::router;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    pub store: Arc<dyn MediaStore>,
    pub gallery: Arc<GalleryService>,
    pub mailer: Option<Arc<dyn Mailer>>,
    pub identity: Arc<dyn IdentityProvider>,
    pub translations: TranslationStore,
}

impl AppState {
    /// Wires explicit services.
    pub fn new(
        config: SiteConfig,
        store: Arc<dyn MediaStore>,
        mailer: Option<Arc<dyn Mailer>>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        let gallery = Arc::new(GalleryService::new(
            store.clone(),
            config.gallery.fetch_timeout(),
        ));
        let translations = TranslationStore::new(config.locales.directory.clone());

        AppState {
            config: Arc::new(config),
            store,
            gallery,
            mailer,
            identity,
            translations,
        }
    }

    /// Builds every service from configuration, degrading when credentials
    /// are missing.
    pub fn from_config(config: SiteConfig) -> Self {
        let store: Arc<dyn MediaStore> = match CloudinaryClient::new(&config.media) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                warn!("Media store unavailable ({}), serving an empty in-memory library", e);
                Arc::new(MemoryStore::new())
            }
        };

        let mailer: Option<Arc<dyn Mailer>> = match ResendMailer::new(&config.email) {
            Ok(mailer) => Some(Arc::new(mailer)),
            Err(e) => {
                warn!("Contact email disabled: {}", e);
                None
            }
        };

        let identity: Arc<dyn IdentityProvider> = match JwtIdentity::new(&config.auth) {
            Ok(identity) => Arc::new(identity),
            Err(e) => {
                warn!("Sign-in disabled: {}", e);
                Arc::new(SignedOut)
            }
        };

        Self::new(config, store, mailer, identity)
    }
}
