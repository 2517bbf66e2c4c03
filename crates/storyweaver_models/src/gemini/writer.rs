//! Gemini `generateContent` client.

use async_trait::async_trait;
use gemini_rust::{Gemini, client::Model};
use tracing::{debug, instrument};

use storyweaver_core::{RetrySettings, TextRequest, TextSettings};
use storyweaver_error::{GenerationError, GenerationErrorKind, StoryweaverResult};
use storyweaver_interface::StoryWriter;

use crate::with_retry;

/// Story writer backed by Google Gemini.
///
/// Requests that name a model other than the default get a client built
/// for that model on the spot.
pub struct GeminiWriter {
    /// Client for the default model
    client: Gemini,
    /// Kept for building clients for per-request model overrides
    api_key: String,
    /// Default model name
    model_name: String,
    /// Default sampling temperature
    temperature: Option<f32>,
    /// Default output token cap
    max_output_tokens: Option<u32>,
    /// Retry configuration
    retry: RetrySettings,
}

impl std::fmt::Debug for GeminiWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiWriter")
            .field("model_name", &self.model_name)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl GeminiWriter {
    /// Create a writer for the model named in `settings`.
    ///
    /// # Errors
    ///
    /// Returns a generation error if the Gemini client cannot be built.
    #[instrument(name = "gemini_writer_new", skip(api_key), fields(model = %settings.model()))]
    pub fn new(
        api_key: &str,
        settings: &TextSettings,
        retry: RetrySettings,
    ) -> StoryweaverResult<Self> {
        let client = Self::build_client(api_key, settings.model())?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model_name: settings.model().clone(),
            temperature: *settings.temperature(),
            max_output_tokens: *settings.max_output_tokens(),
            retry,
        })
    }

    fn build_client(api_key: &str, model_name: &str) -> Result<Gemini, GenerationError> {
        Gemini::with_model(api_key, Self::model_name_to_enum(model_name)).map_err(|e| {
            GenerationError::new(GenerationErrorKind::ClientCreation(format!(
                "Gemini client for {}: {}",
                model_name, e
            )))
        })
    }

    /// Convert a model name string to a gemini-rust Model enum variant.
    ///
    /// Unrecognized names become `Model::Custom` with the "models/" prefix
    /// the API requires.
    fn model_name_to_enum(name: &str) -> Model {
        match name {
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.5-pro" => Model::Gemini25Pro,
            other if other.starts_with("models/") => Model::Custom(other.to_string()),
            other => Model::Custom(format!("models/{}", other)),
        }
    }

    /// Parse gemini-rust errors to extract HTTP status codes.
    fn parse_gemini_error(err: impl std::fmt::Display) -> GenerationError {
        let err_msg = err.to_string();

        // Example: "bad response from server; code 503; description: ..."
        if let Some(status_code) = Self::extract_status_code(&err_msg) {
            GenerationError::new(GenerationErrorKind::HttpStatus {
                status_code,
                message: err_msg,
            })
        } else {
            GenerationError::new(GenerationErrorKind::Request(err_msg))
        }
    }

    /// Extract HTTP status code from error message string.
    fn extract_status_code(error_msg: &str) -> Option<u16> {
        let code_start = error_msg.find("code ")?;
        let code_str = &error_msg[code_start + 5..];
        let end = code_str
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(code_str.len());
        code_str[..end].parse().ok()
    }

    async fn send(&self, client: &Gemini, req: &TextRequest) -> Result<String, GenerationError> {
        let temperature = (*req.temperature()).or(self.temperature);
        let max_output_tokens = (*req.max_output_tokens()).or(self.max_output_tokens);

        let mut builder = client.generate_content().with_user_message(req.prompt());

        if let Some(system) = req.system() {
            builder = builder.with_system_prompt(system);
        }
        if let Some(temp) = temperature {
            builder = builder.with_temperature(temp);
        }
        if let Some(max_tok) = max_output_tokens {
            builder = builder.with_max_output_tokens(max_tok as i32);
        }

        let response = builder.execute().await.map_err(Self::parse_gemini_error)?;
        let text = response.text();

        if text.trim().is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::EmptyResponse(
                "Gemini returned no text".to_string(),
            )));
        }
        Ok(text)
    }
}

#[async_trait]
impl StoryWriter for GeminiWriter {
    #[instrument(skip(self, req), fields(provider = "gemini", model = tracing::field::Empty))]
    async fn write(&self, req: &TextRequest) -> StoryweaverResult<String> {
        let model_name = req.model().as_deref().unwrap_or(&self.model_name);
        tracing::Span::current().record("model", model_name);

        let override_client;
        let client = if model_name == self.model_name {
            &self.client
        } else {
            override_client = Self::build_client(&self.api_key, model_name)?;
            &override_client
        };

        debug!(prompt_len = req.prompt().len(), "Sending generateContent request");
        let text = with_retry(&self.retry, || self.send(client, req)).await?;
        debug!(text_len = text.len(), "Received story text");
        Ok(text)
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
