//! Domain error types
//!
//! These errors represent business logic failures, distinct from infrastructure errors.
//! Validation failures are not errors: they are returned as [`ValidationErrors`] data.
//!
//! [`ValidationErrors`]: super::validation::ValidationErrors

use std::path::PathBuf;

use thiserror::Error;

use super::types::{FieldKind, FieldName};

/// Errors raised while translating a UI field-change event into a form event
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// The event named a field the form does not have
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// The event kind does not match the field (e.g. a checkbox event for the email)
    #[error("Field {field} does not accept {kind} input")]
    KindMismatch { field: FieldName, kind: FieldKind },

    /// Unknown field kind
    #[error("Unknown field kind: {0}")]
    UnknownKind(String),

    /// Gender outside {Male, Female}
    #[error("Unknown gender: {0}")]
    UnknownGender(String),

    /// Skill outside the fixed option list
    #[error("Unknown skill: {0} (expected one of HTML, CSS, JavaScript, React)")]
    UnknownSkill(String),
}

/// Errors raised while reading a profile picture into a preview
#[derive(Debug, Error)]
pub enum PreviewError {
    /// Reading the file failed
    #[error("Failed to read picture: {0}")]
    Io(#[from] std::io::Error),

    /// File exceeds the configured preview limit
    #[error("Picture is too large: {size} bytes (max {max})")]
    TooLarge { size: u64, max: u64 },

    /// Path is a directory, device or pipe rather than a regular file
    #[error("Not a regular file: {0}")]
    NotAFile(String),

    /// Neither the content nor the extension identifies an image
    #[error("Not a recognized image: {0}")]
    UnsupportedFormat(String),
}

/// Errors raised by persistence adapters
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem access failed
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Entries could not be serialized
    #[error("Failed to encode entries: {0}")]
    Encode(#[from] serde_json::Error),

    /// Slot content is not a valid entry list
    #[error("Failed to decode slot {slot}: {source}")]
    Decode {
        slot: String,
        #[source]
        source: serde_json::Error,
    },

    /// Backend refused the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
