//! # Error Types
//!
//! Domain-specific error types for designo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  designo-core errors (this file)                                       │
//! │  ├── CoreError        - Rule violations (unknown category, auth, ...)  │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  designo-media errors (separate crate)                                 │
//! │  └── MediaError       - External service failures                      │
//! │                                                                         │
//! │  Site API errors (in app)                                              │
//! │  └── SiteError        - What the browser sees (status + JSON)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → MediaError → SiteError → Browser  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The rotation engine itself has no error paths: timing, selection and
//! transitions are pure local computation. Errors here come from inputs.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Folder name is not one of the gallery categories.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Locale code is not `hr` or `en`.
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// Carousel timings are inconsistent.
    ///
    /// ## When This Occurs
    /// - Zero dwell or transition duration
    /// - Transition shorter than the mount delay (the slide would commit
    ///   before its animation started)
    #[error("Invalid carousel timing: {reason}")]
    InvalidTiming { reason: String },

    /// An authenticated-only action was attempted while signed out.
    #[error("You must be signed in to {action}")]
    NotSignedIn { action: String },

    /// Asset is not present in the gallery cache.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// A delete for this asset has already been requested.
    #[error("Delete already in progress for {0}")]
    DeleteInProgress(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before anything reaches an external service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Name of the offending field (used to key form error messages).
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
