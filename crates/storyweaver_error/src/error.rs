//! Top-level error wrapper types.

use crate::{ConfigError, GenerationError, JsonError, StorageError};

/// Every error family a Storyweaver run can produce.
///
/// # Examples
///
/// ```
/// use storyweaver_error::{StoryweaverError, ConfigError};
///
/// let config_err = ConfigError::new("story_length_pages out of range");
/// let err: StoryweaverError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum StoryweaverErrorKind {
    /// Invalid story configuration, settings or credentials
    #[from(ConfigError)]
    Config(ConfigError),
    /// Remote text or image generation failed
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Output directory or file could not be written
    #[from(StorageError)]
    Storage(StorageError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
}

/// Storyweaver error with kind discrimination.
///
/// # Examples
///
/// ```
/// use storyweaver_error::{StoryweaverErrorKind, StoryweaverResult, ConfigError};
///
/// fn might_fail() -> StoryweaverResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), StoryweaverErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Storyweaver Error: {}", _0)]
pub struct StoryweaverError(Box<StoryweaverErrorKind>);

impl StoryweaverError {
    /// Create a new error from a kind.
    pub fn new(kind: StoryweaverErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryweaverErrorKind {
        &self.0
    }

    /// True when the failure happened before any remote call was made.
    pub fn is_config(&self) -> bool {
        matches!(self.kind(), StoryweaverErrorKind::Config(_))
    }
}

// Generic From implementation for any type that converts to StoryweaverErrorKind
impl<T> From<T> for StoryweaverError
where
    T: Into<StoryweaverErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Storyweaver operations.
pub type StoryweaverResult<T> = std::result::Result<T, StoryweaverError>;
