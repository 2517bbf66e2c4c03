//! OpenAI Images API data transfer objects.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use storyweaver_core::ImageFormat;

/// JSON body of `POST /images/generations`.
///
/// The edit endpoint takes the same fields as multipart form parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ImageGenerationRequest {
    /// Model identifier
    model: String,
    /// Illustration prompt
    prompt: String,
    /// Number of images
    #[builder(default = "1")]
    n: u32,
    /// Image size, e.g. "1536x1024"
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<String>,
    /// Quality hint
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<String>,
    /// Requested encoding (gpt-image models only)
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    output_format: Option<ImageFormat>,
    /// "b64_json" for DALL-E models; gpt-image models always return base64
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<String>,
}

impl ImageGenerationRequest {
    /// Creates a new builder for `ImageGenerationRequest`.
    pub fn builder() -> ImageGenerationRequestBuilder {
        ImageGenerationRequestBuilder::default()
    }
}

/// One generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ImageData {
    /// Base64-encoded image bytes
    #[serde(default)]
    b64_json: Option<String>,
    /// Prompt as rewritten by the service, if it did so
    #[serde(default)]
    revised_prompt: Option<String>,
}

/// Response of both image endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ImagesResponse {
    /// Unix timestamp of creation
    #[serde(default)]
    created: u64,
    /// Generated images
    #[serde(default)]
    data: Vec<ImageData>,
    /// Encoding of the returned images (gpt-image models)
    #[serde(default)]
    output_format: Option<ImageFormat>,
}
