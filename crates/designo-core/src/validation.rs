//! # Validation Module
//!
//! Input rules for the contact form and the dashboard upload.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser form                                                 │
//! │  └── Immediate feedback next to each field                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Site API (Rust)                                              │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: field rules, every error collected                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: External services (email API, media store)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes, so `"Ćiro"` is four long.
//!
//! ## Usage
//! ```rust
//! use designo_core::validation::ContactForm;
//!
//! let form = ContactForm {
//!     name: "Ana".into(),
//!     email: "ana@example.com".into(),
//!     message: "Zanima me vjenčanje u lipnju.".into(),
//! };
//! assert!(form.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Category;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum length of the sender's name.
pub const MIN_NAME_LEN: usize = 2;

/// Minimum length of the message body.
pub const MIN_MESSAGE_LEN: usize = 10;

/// Upper bound on any contact field, to keep emails sane.
pub const MAX_FIELD_LEN: usize = 5_000;

// =============================================================================
// Contact Form
// =============================================================================

/// Contact form as submitted by the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// Checks every field and returns the trimmed form, or all errors.
    pub fn validate(&self) -> Result<ContactForm, Vec<ValidationError>> {
        let errors: Vec<ValidationError> = [
            validate_name(&self.name),
            validate_email(&self.email),
            validate_message(&self.message),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ContactForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        })
    }
}

fn check_length(field: &str, value: &str, min: usize) -> ValidationResult<()> {
    let len = value.chars().count();
    if len == 0 {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    if len > MAX_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_FIELD_LEN,
        });
    }
    Ok(())
}

/// Validates the sender's name.
///
/// ## Rules
/// - At least 2 characters after trimming
pub fn validate_name(name: &str) -> ValidationResult<()> {
    check_length("name", name.trim(), MIN_NAME_LEN)
}

/// Validates the message body.
///
/// ## Rules
/// - At least 10 characters after trimming
pub fn validate_message(message: &str) -> ValidationResult<()> {
    check_length("message", message.trim(), MIN_MESSAGE_LEN)
}

/// Validates an email address.
///
/// ## Rules
/// - Exactly one `@`, non-empty local part
/// - Domain contains a dot, with no empty labels
/// - No whitespace anywhere
///
/// ## Example
/// ```rust
/// use designo_core::validation::validate_email;
///
/// assert!(validate_email("studio@designo.hr").is_ok());
/// assert!(validate_email("studio@designo").is_err());
/// assert!(validate_email("stu dio@designo.hr").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(invalid("missing @"));
    };
    if local.is_empty() || domain.contains('@') {
        return Err(invalid("must look like name@domain.tld"));
    }
    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return Err(invalid("domain must look like domain.tld"));
    }

    Ok(())
}

// =============================================================================
// Upload
// =============================================================================

/// One file of a dashboard upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

/// Validates an upload request and resolves its target category.
///
/// ## Rules
/// - `folder` names a gallery category
/// - At least one file, none empty
/// - Every file is `image/*` or `video/*`
pub fn validate_upload(folder: &str, files: &[UploadFile]) -> ValidationResult<Category> {
    let category: Category = folder.parse().map_err(|_| ValidationError::NotAllowed {
        field: "category".to_string(),
        allowed: Category::ALL.iter().map(|c| c.folder().to_string()).collect(),
    })?;

    if files.is_empty() {
        return Err(ValidationError::Required {
            field: "file".to_string(),
        });
    }

    for file in files {
        if file.size == 0 {
            return Err(ValidationError::Required {
                field: format!("file '{}'", file.file_name),
            });
        }
        let mime = file.content_type.trim().to_ascii_lowercase();
        if !(mime.starts_with("image/") || mime.starts_with("video/")) {
            return Err(ValidationError::NotAllowed {
                field: format!("content type '{}'", file.content_type),
                allowed: vec!["image/*".to_string(), "video/*".to_string()],
            });
        }
    }

    Ok(category)
}

// =============================================================================
// Unit Tests
// =============================================================================
