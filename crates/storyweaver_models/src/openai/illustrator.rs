//! OpenAI Images API client.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info, instrument};

use storyweaver_core::{
    GeneratedImage, ImageFormat, ImageRequest, ImageSettings, MediaSource, ReferenceImage,
    RetrySettings,
};
use storyweaver_error::{ConfigError, GenerationError, GenerationErrorKind, StoryweaverResult};
use storyweaver_interface::Illustrator;

use super::{ImageGenerationRequest, ImagesResponse};
use crate::with_retry;

/// Image generation can take well over a minute at high quality.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// The edit endpoint accepts at most this many input images.
const MAX_EDIT_IMAGES: usize = 16;

/// OpenAI image model families, which differ in the parameters they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageModelFamily {
    /// `gpt-image-*`: base64 output, `output_format`, reference images
    GptImage,
    /// `dall-e-*`: `response_format`, no reference images
    DallE,
}

impl ImageModelFamily {
    /// Classify a model name by prefix.
    pub fn from_model(model: &str) -> Option<Self> {
        let model = model.to_ascii_lowercase();
        if model.starts_with("gpt-image") {
            Some(Self::GptImage)
        } else if model.starts_with("dall-e") {
            Some(Self::DallE)
        } else {
            None
        }
    }
}

/// Illustrator backed by the OpenAI Images API.
///
/// Requests without references go to `/images/generations`. Requests with
/// references go to `/images/edits` when the model supports it, and fall
/// back to generation from the prompt alone otherwise.
#[derive(Clone)]
pub struct OpenAiIllustrator {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    family: ImageModelFamily,
    size: String,
    quality: Option<String>,
    output_format: Option<ImageFormat>,
    retry: RetrySettings,
}

impl std::fmt::Debug for OpenAiIllustrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiIllustrator")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("family", &self.family)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl OpenAiIllustrator {
    /// Create an illustrator for the model named in `settings`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for models outside the `gpt-image`
    /// and `dall-e` families, or a generation error if the HTTP client
    /// cannot be built.
    #[instrument(skip(api_key), fields(model = %settings.model()))]
    pub fn new(
        api_key: &str,
        settings: &ImageSettings,
        retry: RetrySettings,
    ) -> StoryweaverResult<Self> {
        let family = ImageModelFamily::from_model(settings.model()).ok_or_else(|| {
            ConfigError::new(format!(
                "unsupported image model '{}': expected a gpt-image or dall-e model",
                settings.model()
            ))
        })?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::ClientCreation(e.to_string()))
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: settings.base_url().trim_end_matches('/').to_string(),
            model: settings.model().clone(),
            family,
            size: settings.size().clone(),
            quality: settings.quality().clone(),
            output_format: *settings.output_format(),
            retry,
        })
    }

    /// Model family this illustrator was built for.
    pub fn family(&self) -> ImageModelFamily {
        self.family
    }

    fn generation_body(&self, req: &ImageRequest) -> Result<ImageGenerationRequest, GenerationError> {
        let mut builder = ImageGenerationRequest::builder();
        builder
            .model(self.model.clone())
            .prompt(req.prompt().clone())
            .size(Some(req.size().clone().unwrap_or_else(|| self.size.clone())))
            .quality(self.quality.clone());

        match self.family {
            ImageModelFamily::GptImage => {
                builder.output_format(self.output_format);
            }
            ImageModelFamily::DallE => {
                builder.response_format(Some("b64_json".to_string()));
            }
        }

        builder
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::Builder(e.to_string())))
    }

    async fn generate(&self, req: &ImageRequest) -> Result<GeneratedImage, GenerationError> {
        let body = self.generation_body(req)?;
        let url = format!("{}/images/generations", self.base_url);
        debug!(url = %url, "Sending image generation request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Request(e.to_string())))?;

        self.decode(response).await
    }

    async fn edit(
        &self,
        req: &ImageRequest,
        images: &[(String, ImageFormat, Vec<u8>)],
    ) -> Result<GeneratedImage, GenerationError> {
        let url = format!("{}/images/edits", self.base_url);
        debug!(url = %url, references = images.len(), "Sending image edit request");

        let size = req.size().clone().unwrap_or_else(|| self.size.clone());
        let mut form = Form::new()
            .text("model", self.model.clone())
            .text("prompt", req.prompt().clone())
            .text("n", "1")
            .text("size", size);

        if let Some(quality) = &self.quality {
            form = form.text("quality", quality.clone());
        }
        if let Some(format) = self.output_format {
            form = form.text("output_format", format.to_string());
        }

        for (file_name, format, data) in images {
            let part = Part::bytes(data.clone())
                .file_name(file_name.clone())
                .mime_str(format.mime_type())
                .map_err(|e| {
                    GenerationError::new(GenerationErrorKind::ReferenceImage(format!(
                        "{}: {}",
                        file_name, e
                    )))
                })?;
            form = form.part("image[]", part);
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Request(e.to_string())))?;

        self.decode(response).await
    }

    /// Check the status and decode the first image of a response.
    async fn decode(&self, response: reqwest::Response) -> Result<GeneratedImage, GenerationError> {
        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::new(GenerationErrorKind::HttpStatus {
                status_code,
                message,
            }));
        }

        let body: ImagesResponse = response.json().await.map_err(|e| {
            GenerationError::new(GenerationErrorKind::MalformedResponse(format!(
                "Failed to parse image response: {}",
                e
            )))
        })?;

        self.image_from_response(&body)
    }

    fn image_from_response(&self, body: &ImagesResponse) -> Result<GeneratedImage, GenerationError> {
        let encoded = body
            .data()
            .first()
            .and_then(|datum| datum.b64_json().as_deref())
            .ok_or_else(|| {
                GenerationError::new(GenerationErrorKind::EmptyResponse(
                    "image response carried no b64_json data".to_string(),
                ))
            })?;

        let data = STANDARD
            .decode(encoded)
            .map_err(|e| GenerationError::new(GenerationErrorKind::Base64Decode(e.to_string())))?;

        let format = (*body.output_format())
            .or(self.output_format)
            .unwrap_or_default();

        Ok(GeneratedImage::new(data, format))
    }
}

/// Load reference image bytes once, before any attempt is made.
async fn load_reference(
    reference: &ReferenceImage,
) -> Result<(String, ImageFormat, Vec<u8>), GenerationError> {
    let file_name = format!("{}.{}", reference.character(), reference.format().extension());
    let data = match reference.source() {
        MediaSource::Binary(bytes) => bytes.clone(),
        MediaSource::Path(path) => tokio::fs::read(path).await.map_err(|e| {
            GenerationError::new(GenerationErrorKind::ReferenceImage(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?,
    };
    Ok((file_name, *reference.format(), data))
}

#[async_trait]
impl Illustrator for OpenAiIllustrator {
    #[instrument(skip(self, req), fields(provider = "openai", model = %self.model, references = req.references().len()))]
    async fn illustrate(&self, req: &ImageRequest) -> StoryweaverResult<GeneratedImage> {
        let image = if req.has_references() && self.supports_references() {
            let mut images = Vec::with_capacity(req.references().len());
            for reference in req.references().iter().take(MAX_EDIT_IMAGES) {
                images.push(load_reference(reference).await?);
            }
            info!(references = images.len(), "Editing with character references");
            with_retry(&self.retry, || self.edit(req, &images)).await?
        } else {
            if req.has_references() {
                info!("Model does not accept reference images, generating from prompt");
            }
            with_retry(&self.retry, || self.generate(req)).await?
        };

        debug!(bytes = image.data().len(), format = %image.format(), "Received illustration");
        Ok(image)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn supports_references(&self) -> bool {
        self.family == ImageModelFamily::GptImage
    }

    fn max_reference_images(&self) -> usize {
        if self.supports_references() {
            MAX_EDIT_IMAGES
        } else {
            0
        }
    }
}
