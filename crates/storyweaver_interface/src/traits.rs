//! Trait definitions for the remote generation services.

use async_trait::async_trait;
use storyweaver_core::{GeneratedImage, ImageFormat, ImageRequest, TextRequest};
use storyweaver_error::StoryweaverResult;

/// A remote service that writes story prose.
///
/// Implementations make exactly one round trip per call unless retrying
/// has been configured explicitly.
#[async_trait]
pub trait StoryWriter: Send + Sync {
    /// Generate text for a prompt.
    async fn write(&self, req: &TextRequest) -> StoryweaverResult<String>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier (e.g., "gemini-2.5-pro").
    fn model_name(&self) -> &str;
}

/// A remote service that draws one illustration per call.
#[async_trait]
pub trait Illustrator: Send + Sync {
    /// Generate a single image.
    ///
    /// When the request carries reference images and the service supports
    /// them, they are sent with the prompt.
    async fn illustrate(&self, req: &ImageRequest) -> StoryweaverResult<GeneratedImage>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-image-1").
    fn model_name(&self) -> &str;

    /// Whether reference images are accepted at all.
    fn supports_references(&self) -> bool {
        false
    }

    /// Maximum number of reference images per request.
    fn max_reference_images(&self) -> usize {
        0
    }

    /// Accepted reference image formats.
    fn supported_reference_formats(&self) -> &[ImageFormat] {
        &[ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::Webp]
    }
}

#[async_trait]
impl<T: StoryWriter + ?Sized> StoryWriter for Box<T> {
    async fn write(&self, req: &TextRequest) -> StoryweaverResult<String> {
        (**self).write(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<T: Illustrator + ?Sized> Illustrator for Box<T> {
    async fn illustrate(&self, req: &ImageRequest) -> StoryweaverResult<GeneratedImage> {
        (**self).illustrate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn supports_references(&self) -> bool {
        (**self).supports_references()
    }

    fn max_reference_images(&self) -> usize {
        (**self).max_reference_images()
    }

    fn supported_reference_formats(&self) -> &[ImageFormat] {
        (**self).supported_reference_formats()
    }
}
