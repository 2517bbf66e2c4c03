//! Configuration error types.

/// Configuration error with source location.
///
/// Raised for malformed or incomplete story configurations, out-of-range
/// page counts, unreadable settings files and missing API credentials.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyweaver_error::ConfigError;
    ///
    /// let err = ConfigError::new("story_length_pages must be between 4 and 20, got 25");
    /// assert!(err.message.contains("story_length_pages"));
    /// assert!(format!("{}", err).starts_with("Configuration Error: story_length_pages"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
