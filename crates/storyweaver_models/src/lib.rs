//! Remote service clients for Storyweaver.
//!
//! - [`GeminiWriter`] writes story prose through Google Gemini.
//! - [`OpenAiIllustrator`] draws page illustrations through the OpenAI
//!   Images API, using the edit endpoint when character pictures are
//!   attached.
//!
//! Both make a single attempt per call unless retrying is enabled in
//! [`RetrySettings`](storyweaver_core::RetrySettings).
//!
//! # Example
//!
//! ```no_run
//! use storyweaver_core::{Credentials, Settings, TextRequest};
//! use storyweaver_interface::StoryWriter;
//! use storyweaver_models::GeminiWriter;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load(None)?;
//! let credentials = Credentials::from_env()?;
//! let writer = GeminiWriter::new(
//!     credentials.gemini_api_key(),
//!     settings.text(),
//!     *settings.retry(),
//! )?;
//! let request = TextRequest::builder()
//!     .prompt("Write a two-line poem about a turtle.")
//!     .build()?;
//! let text = writer.write(&request).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;
mod openai;
mod retry;

pub use gemini::GeminiWriter;
pub use openai::{
    ImageData, ImageGenerationRequest, ImageGenerationRequestBuilder, ImageModelFamily,
    ImagesResponse, OpenAiIllustrator,
};
pub use retry::with_retry;
