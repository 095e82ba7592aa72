//! # Media Error Types
//!
//! Error types for everything that leaves the process.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Media Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Remote              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Network        │  │  Unauthorized           │ │
//! │  │  MissingCred.   │  │  Timeout        │  │  NotFound               │ │
//! │  │  ConfigLoad/Save│  │  Unavailable    │  │  Rejected               │ │
//! │  │                 │  │  RateLimited    │  │  DeleteFailed           │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │    Identity     │  │    Internal     │                              │
//! │  │                 │  │                 │                              │
//! │  │  InvalidKey     │  │  ChannelError   │                              │
//! │  │                 │  │  ShuttingDown   │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use designo_core::CoreError;

/// Result type alias for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Failure of an external call or of local configuration.
#[derive(Debug, Error)]
pub enum MediaError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid site configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A required credential is empty.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Could not reach the service.
    #[error("Network error: {0}")]
    Network(String),

    /// The call did not finish in time.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The service answered 5xx.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The service asked us to slow down.
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    // =========================================================================
    // Remote Errors
    // =========================================================================
    /// Credentials were refused.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success answer.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Destroy answered with something other than `ok`.
    #[error("Failed to delete {public_id}: {result}")]
    DeleteFailed { public_id: String, result: String },

    /// Body could not be decoded.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    // =========================================================================
    // Identity Errors
    // =========================================================================
    /// Session verification key could not be parsed.
    #[error("Invalid verification key: {0}")]
    InvalidKey(String),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Domain rule violation bubbled up from the core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Channel send/receive failed.
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// The background task is gone.
    #[error("Carousel driver is shutting down")]
    ShuttingDown,
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for MediaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MediaError::Timeout(err.to_string())
        } else if err.is_decode() {
            MediaError::UnexpectedResponse(err.to_string())
        } else {
            MediaError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for MediaError {
    fn from(err: serde_json::Error) -> Self {
        MediaError::UnexpectedResponse(err.to_string())
    }
}

impl From<url::ParseError> for MediaError {
    fn from(err: url::ParseError) -> Self {
        MediaError::InvalidConfig(format!("invalid URL: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for MediaError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        MediaError::InvalidKey(err.to_string())
    }
}

impl From<std::io::Error> for MediaError {
    fn from(err: std::io::Error) -> Self {
        MediaError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for MediaError {
    fn from(err: toml::de::Error) -> Self {
        MediaError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for MediaError {
    fn from(err: toml::ser::Error) -> Self {
        MediaError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization (for retry logic)
// =============================================================================

impl MediaError {
    /// Returns true if repeating the call may succeed.
    ///
    /// ## Retryable Errors
    /// - Network failures and timeouts
    /// - 5xx answers and rate limiting
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MediaError::Network(_)
                | MediaError::Timeout(_)
                | MediaError::ServiceUnavailable(_)
                | MediaError::RateLimited { .. }
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            MediaError::InvalidConfig(_)
                | MediaError::MissingCredential(_)
                | MediaError::ConfigLoadFailed(_)
                | MediaError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if credentials were missing or refused.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            MediaError::Unauthorized(_) | MediaError::InvalidKey(_) | MediaError::MissingCredential(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(MediaError::Network("connection refused".into()).is_retryable());
        assert!(MediaError::Timeout("5s".into()).is_retryable());
        assert!(MediaError::RateLimited { retry_after_secs: 60 }.is_retryable());

        assert!(!MediaError::Unauthorized("bad key".into()).is_retryable());
        assert!(!MediaError::InvalidConfig("port".into()).is_retryable());
        assert!(!MediaError::DeleteFailed {
            public_id: "weddings/1".into(),
            result: "not found".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_categories() {
        assert!(MediaError::MissingCredential("CLOUDINARY_API_KEY".into()).is_config_error());
        assert!(MediaError::MissingCredential("CLOUDINARY_API_KEY".into()).is_auth_error());
        assert!(!MediaError::NotFound("x".into()).is_auth_error());
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: MediaError = CoreError::UnknownCategory("portraits".into()).into();
        assert_eq!(err.to_string(), "Unknown category: portraits");
    }
}
