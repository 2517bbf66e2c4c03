//! Error types for Storyweaver.
//!
//! This crate provides the error types shared by every Storyweaver crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The three families a run can fail with are configuration
//! ([`ConfigError`]), remote generation ([`GenerationError`]) and output
//! storage ([`StorageError`]).
//!
//! # Examples
//!
//! ```
//! use storyweaver_error::{ConfigError, StoryweaverResult};
//!
//! fn load() -> StoryweaverResult<u32> {
//!     Err(ConfigError::new("characters must not be empty"))?
//! }
//!
//! match load() {
//!     Ok(pages) => println!("{} pages", pages),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod json;
mod storage;

pub use config::ConfigError;
pub use error::{StoryweaverError, StoryweaverErrorKind, StoryweaverResult};
pub use generation::{GenerationError, GenerationErrorKind, RetryableError};
pub use json::JsonError;
pub use storage::{StorageError, StorageErrorKind};
