//! Provider-neutral requests for the text and image services.

use crate::{ImageFormat, MediaSource};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A single text-generation request.
///
/// # Examples
///
/// ```
/// use storyweaver_core::TextRequest;
///
/// let request = TextRequest::builder()
///     .prompt("Write a story about a turtle.")
///     .temperature(Some(0.9))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.prompt(), "Write a story about a turtle.");
/// assert!(request.model().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct TextRequest {
    /// User prompt
    prompt: String,
    /// Optional system instruction
    #[builder(default)]
    system: Option<String>,
    /// Model override; the writer's default model is used when `None`
    #[builder(default)]
    model: Option<String>,
    /// Sampling temperature
    #[builder(default)]
    temperature: Option<f32>,
    /// Output token cap
    #[builder(default)]
    max_output_tokens: Option<u32>,
}

impl TextRequest {
    /// Create a new builder.
    pub fn builder() -> TextRequestBuilder {
        TextRequestBuilder::default()
    }
}

/// A character picture supplied to the image service as grounding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct ReferenceImage {
    /// Name of the character pictured
    character: String,
    /// Format of the picture
    format: ImageFormat,
    /// Image content
    source: MediaSource,
}

impl ReferenceImage {
    /// Create a reference image for `character`.
    pub fn new(character: impl Into<String>, format: ImageFormat, source: MediaSource) -> Self {
        Self {
            character: character.into(),
            format,
            source,
        }
    }
}

/// A single illustration request.
///
/// An empty `references` list asks the service to draw from the prompt
/// alone; otherwise the referenced pictures are sent alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ImageRequest {
    /// Illustration prompt
    prompt: String,
    /// Character pictures to ground the illustration
    #[builder(default)]
    references: Vec<ReferenceImage>,
    /// Requested size, e.g. "1536x1024"
    #[builder(default)]
    size: Option<String>,
}

impl ImageRequest {
    /// Create a new builder.
    pub fn builder() -> ImageRequestBuilder {
        ImageRequestBuilder::default()
    }

    /// True when at least one reference image is attached.
    pub fn has_references(&self) -> bool {
        !self.references.is_empty()
    }
}
