//! Error types for SmartSpace.

use thiserror::Error;

/// Result type alias using SmartSpace's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown when an item is refused by the language gate or yields no sample.
pub const LANGUAGE_UNSUPPORTED_MESSAGE: &str =
    "The file language is not supported. Please import English text files.";

/// Message shown when pasted text is empty after trimming.
pub const EMPTY_TEXT_MESSAGE: &str = "Text cannot be empty. Paste some English text to save.";

/// Core error type for SmartSpace operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Space not found
    #[error("Space not found: {0}")]
    SpaceNotFound(uuid::Uuid),

    /// Attachment not found
    #[error("Attachment not found: {0}")]
    AttachmentNotFound(uuid::Uuid),

    /// A live space already uses this name (case/diacritic-insensitive)
    #[error("A space with this name already exists: {0}")]
    DuplicateSpaceName(String),

    /// The attachment directory could not be created or configured.
    /// Fatal for a whole import batch.
    #[error("Attachment directory error: {0}")]
    Directory(String),

    /// Copying a source file into the attachment directory failed.
    #[error("Copy failed: {0}")]
    Copy(String),

    /// The classifier found no usable content family.
    #[error("Unsupported container: {0}")]
    UnsupportedContainer(String),

    /// The sampler produced no usable text.
    #[error("Text extraction failed: {0}")]
    ExtractionFailed(String),

    /// The language gate refused the sample. Carries the detected tag, if any.
    #[error("Language unsupported (detected: {})", .0.as_deref().unwrap_or("unknown"))]
    LanguageUnsupported(Option<String>),

    /// Pasted text was empty after trimming.
    #[error("Pasted text is empty")]
    EmptyText,

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for per-item admission refusals, as opposed to operational failures.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedContainer(_)
                | Error::ExtractionFailed(_)
                | Error::LanguageUnsupported(_)
                | Error::EmptyText
        )
    }

    /// Human-readable message for end users.
    ///
    /// Unsupported types, extraction failures, and language mismatches all
    /// read the same way.
    pub fn user_message(&self) -> String {
        match self {
            Error::UnsupportedContainer(_)
            | Error::LanguageUnsupported(_)
            | Error::ExtractionFailed(_) => {
                LANGUAGE_UNSUPPORTED_MESSAGE.to_string()
            }
            Error::EmptyText => EMPTY_TEXT_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
