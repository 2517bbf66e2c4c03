//! Test utilities for pipeline tests.
//!
//! In-process writer and illustrator stand-ins that count calls and record
//! what they were asked for.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use storyweaver_core::{GeneratedImage, ImageFormat, ImageRequest, TextRequest};
use storyweaver_error::{GenerationError, GenerationErrorKind, StoryweaverResult};
use storyweaver_interface::{Illustrator, StoryWriter};

/// Behavior configuration for the mock writer.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always return the given text
    Success(String),
    /// Always fail with the given error
    Error(GenerationErrorKind),
}

/// Story writer that answers from a script.
#[derive(Clone)]
pub struct MockWriter {
    behavior: MockBehavior,
    requests: Arc<Mutex<Vec<TextRequest>>>,
}

impl MockWriter {
    /// A writer that always returns `text`.
    pub fn new_success(text: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Success(text.into()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A writer that always fails.
    pub fn new_error(error: GenerationErrorKind) -> Self {
        Self {
            behavior: MockBehavior::Error(error),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of write() calls so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<TextRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StoryWriter for MockWriter {
    async fn write(&self, req: &TextRequest) -> StoryweaverResult<String> {
        self.requests.lock().unwrap().push(req.clone());
        match &self.behavior {
            MockBehavior::Success(text) => Ok(text.clone()),
            MockBehavior::Error(kind) => Err(GenerationError::new(kind.clone()).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock-writer"
    }

    fn model_name(&self) -> &str {
        "mock-writer"
    }
}

/// Illustrator that returns a tiny PNG and records every request.
#[derive(Clone)]
pub struct MockIllustrator {
    supports_references: bool,
    fail_on_call: Option<usize>,
    requests: Arc<Mutex<Vec<ImageRequest>>>,
}

impl MockIllustrator {
    /// An illustrator that accepts reference images.
    pub fn new() -> Self {
        Self {
            supports_references: true,
            fail_on_call: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// An illustrator that ignores reference images.
    pub fn without_references() -> Self {
        Self {
            supports_references: false,
            ..Self::new()
        }
    }

    /// Fail the `call`-th request (1-based) with a 500.
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::new()
        }
    }

    /// Number of illustrate() calls so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<ImageRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Illustrator for MockIllustrator {
    async fn illustrate(&self, req: &ImageRequest) -> StoryweaverResult<GeneratedImage> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(req.clone());
            requests.len()
        };

        if self.fail_on_call == Some(call) {
            return Err(GenerationError::new(GenerationErrorKind::HttpStatus {
                status_code: 500,
                message: "mock failure".to_string(),
            })
            .into());
        }

        Ok(GeneratedImage::new(
            vec![0x89, b'P', b'N', b'G', call as u8],
            ImageFormat::Png,
        ))
    }

    fn provider_name(&self) -> &'static str {
        "mock-illustrator"
    }

    fn model_name(&self) -> &str {
        "mock-illustrator"
    }

    fn supports_references(&self) -> bool {
        self.supports_references
    }

    fn max_reference_images(&self) -> usize {
        if self.supports_references { 16 } else { 0 }
    }
}

/// A `---`-delimited story with `pages` pages.
///
/// Page `n` mentions the names in `cast[n - 1]`.
pub fn delimited_story(cast: &[&[&str]]) -> String {
    cast.iter()
        .enumerate()
        .map(|(index, names)| {
            if names.is_empty() {
                format!("Page {} has waves rolling over the quiet sand.", index + 1)
            } else {
                format!(
                    "Page {}: {} walked along the shore together.",
                    index + 1,
                    names.join(" and ")
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}

/// Write a story configuration file and return its path.
pub fn write_config(dir: &Path, config: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.join("story_config.json");
    std::fs::write(&path, serde_json::to_string_pretty(config).unwrap()).unwrap();
    path
}
