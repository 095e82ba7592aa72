//! # Site Configuration
//!
//! Configuration management for the site and its external services.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CLOUDINARY_CLOUD_NAME=designo                                      │
//! │     RESEND_API_KEY=re_...                                              │
//! │     DESIGNO_PORT=8080                                                  │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/designo-site/site.toml (Linux)                           │
//! │     ~/Library/Application Support/com.designo.site/site.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     4 s dwell, 1 s transition, 9 items per page                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # site.toml
//! [media]
//! cloud_name = "designo"
//! api_key = "123456789012345"
//! api_secret = "..."
//!
//! [email]
//! to = "fotovideo.designo@gmail.com"
//!
//! [carousel]
//! dwell_ms = 4000
//! transition_ms = 1000
//! policy = "sequential"   # sequential | shuffled | shuffled_no_repeat
//!
//! [gallery]
//! page_size = 9
//! fetch_batch = 27
//! fetch_timeout_secs = 5
//!
//! [server]
//! port = 3000
//! public_url = "https://foto-designo.com"
//! ```
//!
//! Secrets are normally left out of the file and supplied through the
//! environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use designo_core::validation::validate_email;
use designo_core::{CarouselConfig, Category, GalleryConfig, Locale, RotationPolicy, MAX_RESULTS};

use crate::error::{MediaError, MediaResult};

// =============================================================================
// Media Store Settings
// =============================================================================

/// Credentials and limits for the hosted media store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaSettings {
    /// Account (cloud) name.
    #[serde(default)]
    pub cloud_name: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub api_secret: String,

    /// REST base, without the cloud name.
    #[serde(default = "default_media_base_url")]
    pub api_base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Upper bound on one search page.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_media_base_url() -> String {
    "https://api.cloudinary.com/v1_1".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_max_results() -> usize {
    MAX_RESULTS
}

impl Default for MediaSettings {
    fn default() -> Self {
        MediaSettings {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            api_base_url: default_media_base_url(),
            request_timeout_secs: default_request_timeout(),
            max_results: default_max_results(),
        }
    }
}

impl MediaSettings {
    /// Returns true when every credential is present.
    pub fn has_credentials(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// =============================================================================
// Email Settings
// =============================================================================

/// Transactional email API used by the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSettings {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_email_base_url")]
    pub base_url: String,

    /// Sender address.
    #[serde(default = "default_email_from")]
    pub from: String,

    /// Studio inbox receiving contact submissions.
    #[serde(default = "default_email_to")]
    pub to: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_email_base_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_email_from() -> String {
    "onboarding@resend.dev".to_string()
}

fn default_email_to() -> String {
    "fotovideo.designo@gmail.com".to_string()
}

impl Default for EmailSettings {
    fn default() -> Self {
        EmailSettings {
            api_key: String::new(),
            base_url: default_email_base_url(),
            from: default_email_from(),
            to: default_email_to(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

// =============================================================================
// Auth Settings
// =============================================================================

/// Signature algorithm of session tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenAlgorithm {
    /// Shared secret.
    #[default]
    Hs256,
    /// Provider public key (PEM).
    Rs256,
}

impl std::str::FromStr for TokenAlgorithm {
    type Err = MediaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hs256" => Ok(TokenAlgorithm::Hs256),
            "rs256" => Ok(TokenAlgorithm::Rs256),
            other => Err(MediaError::InvalidConfig(format!(
                "Unknown token algorithm: '{}'. Valid options: hs256, rs256",
                other
            ))),
        }
    }
}

/// Verification of identity-provider session tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSettings {
    /// HS256 secret or RS256 public key PEM. Empty disables sign-in.
    #[serde(default)]
    pub verification_key: String,

    #[serde(default)]
    pub algorithm: TokenAlgorithm,

    /// Expected `iss` claim, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

impl AuthSettings {
    pub fn is_enabled(&self) -> bool {
        !self.verification_key.is_empty()
    }
}

// =============================================================================
// Carousel & Gallery Settings
// =============================================================================

/// Rotation timings, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselSettings {
    #[serde(default = "default_dwell")]
    pub dwell_ms: u64,

    #[serde(default = "default_transition")]
    pub transition_ms: u64,

    /// Delay before the entering slide animates.
    #[serde(default = "default_mount_delay")]
    pub mount_delay_ms: u64,

    #[serde(default = "default_breakpoint")]
    pub mobile_breakpoint: u32,

    #[serde(default)]
    pub policy: RotationPolicy,
}

fn default_dwell() -> u64 {
    designo_core::DEFAULT_DWELL_MS
}

fn default_transition() -> u64 {
    designo_core::DEFAULT_TRANSITION_MS
}

fn default_mount_delay() -> u64 {
    designo_core::DEFAULT_MOUNT_DELAY_MS
}

fn default_breakpoint() -> u32 {
    designo_core::DEFAULT_MOBILE_BREAKPOINT
}

impl Default for CarouselSettings {
    fn default() -> Self {
        CarouselSettings {
            dwell_ms: default_dwell(),
            transition_ms: default_transition(),
            mount_delay_ms: default_mount_delay(),
            mobile_breakpoint: default_breakpoint(),
            policy: RotationPolicy::default(),
        }
    }
}

impl CarouselSettings {
    pub fn to_carousel_config(&self) -> CarouselConfig {
        CarouselConfig {
            dwell: Duration::from_millis(self.dwell_ms),
            transition: Duration::from_millis(self.transition_ms),
            mount_delay: Duration::from_millis(self.mount_delay_ms),
            mobile_breakpoint: self.mobile_breakpoint,
            policy: self.policy,
        }
    }
}

/// Category grid paging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GallerySettings {
    /// Items revealed per "view more".
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Items requested per fetch.
    #[serde(default = "default_fetch_batch")]
    pub fetch_batch: usize,

    /// A fetch slower than this is reported as a retryable failure.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
}

fn default_page_size() -> usize {
    designo_core::DEFAULT_PAGE_SIZE
}

fn default_fetch_batch() -> usize {
    designo_core::DEFAULT_FETCH_BATCH
}

fn default_fetch_timeout() -> u64 {
    5
}

fn default_categories() -> Vec<Category> {
    Category::ALL.to_vec()
}

impl Default for GallerySettings {
    fn default() -> Self {
        GallerySettings {
            page_size: default_page_size(),
            fetch_batch: default_fetch_batch(),
            fetch_timeout_secs: default_fetch_timeout(),
            categories: default_categories(),
        }
    }
}

impl GallerySettings {
    pub fn to_gallery_config(&self) -> GalleryConfig {
        GalleryConfig {
            page_size: self.page_size,
            fetch_batch: self.fetch_batch,
            categories: self.categories.clone(),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

// =============================================================================
// Locale & Server Settings
// =============================================================================

/// Where translation bundles live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocaleSettings {
    /// Directory holding `<locale>/common.json`.
    #[serde(default = "default_locales_dir")]
    pub directory: PathBuf,

    #[serde(default)]
    pub default_locale: Locale,
}

fn default_locales_dir() -> PathBuf {
    PathBuf::from("public/locales")
}

impl Default for LocaleSettings {
    fn default() -> Self {
        LocaleSettings {
            directory: default_locales_dir(),
            default_locale: Locale::default(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Canonical origin used in robots.txt and the sitemap.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_url() -> String {
    "https://foto-designo.com".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
            public_url: default_public_url(),
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Public origin without a trailing slash.
    pub fn origin(&self) -> &str {
        self.public_url.trim_end_matches('/')
    }
}

// =============================================================================
// Main Site Configuration
// =============================================================================

/// Complete site configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub media: MediaSettings,

    #[serde(default)]
    pub email: EmailSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub carousel: CarouselSettings,

    #[serde(default)]
    pub gallery: GallerySettings,

    #[serde(default)]
    pub locales: LocaleSettings,

    #[serde(default)]
    pub server: ServerSettings,
}

impl SiteConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (site.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> MediaResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading site config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load site config: {}. Using defaults.", e);
            let mut config = Self::default();
            config.apply_env_overrides();
            config
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> MediaResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| MediaError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| MediaError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| MediaError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Site config saved");
        Ok(())
    }

    /// Validates the configuration.
    ///
    /// Missing credentials are not an error here; the site starts without
    /// them and the affected services report it when constructed.
    pub fn validate(&self) -> MediaResult<()> {
        self.carousel.to_carousel_config().validate()?;
        self.gallery.to_gallery_config().validate()?;

        if self.gallery.fetch_timeout_secs == 0 {
            return Err(MediaError::InvalidConfig(
                "fetch_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.media.max_results == 0 || self.media.max_results > MAX_RESULTS {
            return Err(MediaError::InvalidConfig(format!(
                "max_results must be between 1 and {}",
                MAX_RESULTS
            )));
        }

        url::Url::parse(&self.media.api_base_url)?;
        url::Url::parse(&self.email.base_url)?;
        url::Url::parse(&self.server.public_url)?;

        validate_email(&self.email.from).map_err(|e| MediaError::InvalidConfig(e.to_string()))?;
        validate_email(&self.email.to).map_err(|e| MediaError::InvalidConfig(e.to_string()))?;

        if self.server.port == 0 {
            return Err(MediaError::InvalidConfig("port must be greater than 0".into()));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Media store
        if let Some(name) = lookup("CLOUDINARY_CLOUD_NAME") {
            debug!(cloud_name = %name, "Overriding media cloud name from environment");
            self.media.cloud_name = name;
        }
        if let Some(key) = lookup("CLOUDINARY_API_KEY") {
            self.media.api_key = key;
        }
        if let Some(secret) = lookup("CLOUDINARY_API_SECRET") {
            self.media.api_secret = secret;
        }

        // Email
        if let Some(key) = lookup("RESEND_API_KEY") {
            self.email.api_key = key;
        }
        if let Some(to) = lookup("DESIGNO_CONTACT_TO") {
            self.email.to = to;
        }

        // Auth
        if let Some(key) = lookup("DESIGNO_AUTH_SECRET") {
            self.auth.verification_key = key;
        }
        if let Some(alg) = lookup("DESIGNO_AUTH_ALGORITHM") {
            match alg.parse() {
                Ok(parsed) => self.auth.algorithm = parsed,
                Err(_) => warn!(algorithm = %alg, "Unknown token algorithm in environment"),
            }
        }
        if let Some(issuer) = lookup("DESIGNO_AUTH_ISSUER") {
            self.auth.issuer = Some(issuer);
        }

        // Carousel
        if let Some(policy) = lookup("DESIGNO_CAROUSEL_POLICY") {
            match policy.to_lowercase().as_str() {
                "sequential" => self.carousel.policy = RotationPolicy::Sequential,
                "shuffled" => self.carousel.policy = RotationPolicy::Shuffled,
                "shuffled_no_repeat" => self.carousel.policy = RotationPolicy::ShuffledNoRepeat,
                _ => warn!(policy = %policy, "Unknown rotation policy in environment"),
            }
        }

        // Locales
        if let Some(dir) = lookup("DESIGNO_LOCALES_DIR") {
            self.locales.directory = PathBuf::from(dir);
        }

        // Server
        if let Some(addr) = lookup("DESIGNO_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
        if let Some(port) = lookup("DESIGNO_PORT") {
            if let Ok(p) = port.parse::<u16>() {
                debug!(port = p, "Overriding port from environment");
                self.server.port = p;
            }
        }
        if let Some(url) = lookup("DESIGNO_PUBLIC_URL") {
            self.server.public_url = url;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "designo", "site")
            .map(|dirs| dirs.config_dir().join("site.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn carousel_config(&self) -> CarouselConfig {
        self.carousel.to_carousel_config()
    }

    pub fn gallery_config(&self) -> GalleryConfig {
        self.gallery.to_gallery_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.carousel.dwell_ms, 4_000);
        assert_eq!(config.gallery.page_size, 9);
        assert_eq!(config.email.to, "fotovideo.designo@gmail.com");
        assert_eq!(config.locales.default_locale, Locale::Hr);
        assert!(!config.media.has_credentials());
        assert!(!config.auth.is_enabled());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: SiteConfig = toml::from_str(
            r#"
            [carousel]
            dwell_ms = 5000
            policy = "shuffled_no_repeat"

            [gallery]
            categories = ["weddings", "newborn"]
            "#,
        )
        .unwrap();

        assert_eq!(config.carousel.dwell_ms, 5_000);
        assert_eq!(config.carousel.transition_ms, 1_000);
        assert_eq!(config.carousel.policy, RotationPolicy::ShuffledNoRepeat);
        assert_eq!(
            config.gallery.categories,
            vec![Category::Weddings, Category::Newborn]
        );
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_config_validation() {
        let mut config = SiteConfig::default();
        assert!(config.validate().is_ok());

        // Transition shorter than the mount delay never animates
        config.carousel.transition_ms = 40;
        assert!(config.validate().is_err());

        config.carousel.transition_ms = 1_000;
        config.gallery.fetch_batch = 500;
        assert!(config.validate().is_err());

        config.gallery.fetch_batch = 27;
        config.email.to = "not-an-address".into();
        assert!(config.validate().unwrap_err().is_config_error());

        config.email.to = "studio@example.com".into();
        config.server.public_url = "::nope".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("CLOUDINARY_CLOUD_NAME", "designo"),
            ("CLOUDINARY_API_KEY", "key"),
            ("CLOUDINARY_API_SECRET", "secret"),
            ("DESIGNO_PORT", "8080"),
            ("DESIGNO_CAROUSEL_POLICY", "shuffled"),
            ("DESIGNO_AUTH_ALGORITHM", "bogus"),
        ]
        .into_iter()
        .collect();

        let mut config = SiteConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert!(config.media.has_credentials());
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.carousel.policy, RotationPolicy::Shuffled);
        // Unknown values are ignored
        assert_eq!(config.auth.algorithm, TokenAlgorithm::Hs256);
    }

    #[test]
    fn test_conversions() {
        let config = SiteConfig::default();
        let carousel = config.carousel_config();
        assert_eq!(carousel, CarouselConfig::default());
        assert_eq!(config.gallery_config(), GalleryConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("site.toml");

        let mut config = SiteConfig::default();
        config.gallery.page_size = 12;
        config.save(Some(path.clone())).unwrap();

        let loaded = SiteConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.gallery.page_size, 12);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&SiteConfig::default()).unwrap();
        assert!(toml_str.contains("[media]"));
        assert!(toml_str.contains("[carousel]"));
        assert!(toml_str.contains("[server]"));
    }
}
