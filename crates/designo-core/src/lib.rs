//! # designo-core: Pure Display Logic for the Designo Studio Site
//!
//! This crate is the **heart** of the site's moving parts. It contains the
//! rotation engine behind the hero slider and the category gallery as plain
//! state machines with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Designo Site Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (browser)                           │   │
//! │  │    Hero slider ──► Category rotator ──► Gallery grid           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CarouselView / JSON API               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ designo-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │  timing   │  │ sequence  │  │ transition │  │ carousel │  │   │
//! │  │   │ progress  │  │ next()    │  │ begin()    │  │ tick()   │  │   │
//! │  │   │ 0 → 1     │  │ shuffle() │  │ commit     │  │ view()   │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   gallery • validation • locale • greeting                      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK READS • NO NETWORK • INJECTED RNG          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                designo-media (I/O Layer)                        │   │
//! │  │     Media store, email, identity, translations, tokio driver    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Slides, media assets, categories
//! - [`timing`] - Per-frame progress signal (Timing Engine)
//! - [`sequence`] - Next-slide selection and Fisher-Yates shuffle
//! - [`transition`] - One-at-a-time animated handoff
//! - [`carousel`] - The composed rotating component
//! - [`gallery`] - Category browser with paging, cache and deletes
//! - [`validation`] - Contact form and upload rules
//! - [`locale`] - `hr` / `en` negotiation and path prefixes
//! - [`greeting`] - Time-of-day dashboard greeting
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Caller-driven time**: every timed rule compares deadlines against the
//!    `Instant` handed to `tick(now)`. Cancelling a timer means clearing a deadline.
//! 2. **Events, not callbacks**: completions are returned from `tick`.
//! 3. **One transition in flight**: extra triggers are dropped, never queued.
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use designo_core::carousel::{Carousel, CarouselConfig};
//! use designo_core::types::Slide;
//!
//! let slides = vec![
//!     Slide::new("a", "/a.jpg", "A"),
//!     Slide::new("b", "/b.jpg", "B"),
//! ];
//!
//! let t0 = Instant::now();
//! let mut rng = rand::rng();
//! let mut carousel = Carousel::new(CarouselConfig::default());
//! carousel.mount(slides, t0, &mut rng);
//!
//! carousel.tick(t0 + Duration::from_millis(4_000));
//! assert!(carousel.pending_key().is_some());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod carousel;
pub mod error;
pub mod gallery;
pub mod greeting;
pub mod locale;
pub mod sequence;
pub mod timing;
pub mod transition;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use designo_core::Carousel` instead of
// `use designo_core::carousel::Carousel`

pub use carousel::{Carousel, CarouselConfig, CarouselEvent, CarouselPhase, CarouselView};
pub use error::{CoreError, CoreResult, ValidationError};
pub use gallery::{
    DeleteRequest, FetchFailure, FetchRequest, GalleryBrowser, GalleryCommand, GalleryConfig,
    GalleryNotice, GalleryOutcome, GalleryView,
};
pub use greeting::Greeting;
pub use locale::Locale;
pub use sequence::RotationPolicy;
pub use types::*;
pub use validation::ContactForm;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default dwell time of a slide before the next transition begins (ms).
pub const DEFAULT_DWELL_MS: u64 = 4_000;

/// Default length of the slide-in animation (ms).
pub const DEFAULT_TRANSITION_MS: u64 = 1_000;

/// Delay between mounting the entering slide and starting its animation (ms).
///
/// The entering slide must render once in its off-screen position before the
/// CSS transition is switched on, otherwise the browser skips the animation.
pub const DEFAULT_MOUNT_DELAY_MS: u64 = 50;

/// Viewport width (px) below which mobile slide variants are used.
pub const DEFAULT_MOBILE_BREAKPOINT: u32 = 768;

/// Number of gallery items revealed per "view more" step.
pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Number of assets requested from the media store per fetch.
pub const DEFAULT_FETCH_BATCH: usize = 27;

/// Hard cap the media store applies to a single search.
pub const MAX_RESULTS: usize = 100;

/// Source rendered in place of an asset that failed to load.
pub const PLACEHOLDER_SOURCE: &str = "/placeholder.svg";
