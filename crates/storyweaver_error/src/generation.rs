//! Remote generation error types and retry classification.

/// Failure conditions of the remote text and image services.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Failed to construct a service client
    #[display("Failed to create client: {}", _0)]
    ClientCreation(String),
    /// The request never produced an HTTP response (connect, timeout, TLS)
    #[display("Request failed: {}", _0)]
    Request(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    HttpStatus {
        /// HTTP status code
        status_code: u16,
        /// Error message or response body
        message: String,
    },
    /// The service answered but produced no usable content
    #[display("Empty response: {}", _0)]
    EmptyResponse(String),
    /// The service answered with a body we could not interpret
    #[display("Malformed response: {}", _0)]
    MalformedResponse(String),
    /// Story text could not be divided into the requested number of pages
    #[display("Expected {} pages, story text has {}", expected, actual)]
    PageCountMismatch {
        /// Requested page count
        expected: usize,
        /// Segments found in the generated text
        actual: usize,
    },
    /// Base64 image payload could not be decoded
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
    /// A character reference image could not be read
    #[display("Reference image unreadable: {}", _0)]
    ReferenceImage(String),
    /// A request could not be assembled
    #[display("Builder error: {}", _0)]
    Builder(String),
}

impl GenerationErrorKind {
    /// Check if this error type is transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationErrorKind::HttpStatus { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            GenerationErrorKind::Request(_) => true,
            _ => false,
        }
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyweaver_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::PageCountMismatch {
///     expected: 10,
///     actual: 7,
/// });
/// assert!(format!("{}", err).contains("Expected 10 pages"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use storyweaver_error::{GenerationError, GenerationErrorKind, RetryableError};
///
/// let err = GenerationError::new(GenerationErrorKind::HttpStatus {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient errors like 503 (service unavailable), 429 (rate limit),
    /// or network timeouts return true. Permanent errors like 401
    /// (unauthorized) or 400 (bad request) return false.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for GenerationError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
