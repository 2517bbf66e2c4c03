//! Storyweaver - illustrated children's storybooks from a JSON description
//!
//! Storyweaver reads a story configuration (characters, theme, age range,
//! setting, page count, illustration style), asks a text model for the
//! story, asks an image model for one illustration per page, and writes the
//! result to a timestamped output directory with a `manifest.json` index.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use storyweaver::{Credentials, Settings, creator_from_settings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load(None)?;
//!     let credentials = Credentials::from_env()?;
//!
//!     let creator = creator_from_settings(&settings, &credentials)?;
//!     let book = creator.create_from_file("story_config.json".as_ref()).await?;
//!     println!("{}", book.directory().display());
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Storyweaver is organized as a workspace with focused crates:
//!
//! - `storyweaver_error` - Error types
//! - `storyweaver_core` - Story configuration, book, request and settings types
//! - `storyweaver_interface` - `StoryWriter` and `Illustrator` traits
//! - `storyweaver_models` - Gemini writer and OpenAI illustrator
//! - `storyweaver_storage` - Output directory and manifest
//! - `storyweaver_pipeline` - Prompts, segmentation and the creation run
//!
//! This crate (`storyweaver`) re-exports everything for convenience.

pub use storyweaver_core::*;
pub use storyweaver_error::*;
pub use storyweaver_interface::*;
pub use storyweaver_models::*;
pub use storyweaver_pipeline::*;
pub use storyweaver_storage::*;

use tracing::instrument;

/// A creator backed by the remote Gemini and OpenAI services.
pub type RemoteStoryCreator = StoryCreator<GeminiWriter, OpenAiIllustrator>;

/// Build a creator wired to the services named in `settings`.
///
/// No remote call is made here; the clients connect on first use.
///
/// # Errors
///
/// Returns a configuration error for an unsupported image model, or a
/// generation error if a client cannot be built.
#[instrument(skip_all, fields(output_dir = %settings.output_dir().display()))]
pub fn creator_from_settings(
    settings: &Settings,
    credentials: &Credentials,
) -> StoryweaverResult<RemoteStoryCreator> {
    let writer = GeminiWriter::new(
        credentials.gemini_api_key(),
        settings.text(),
        *settings.retry(),
    )?;
    let illustrator = OpenAiIllustrator::new(
        credentials.openai_api_key(),
        settings.image(),
        *settings.retry(),
    )?;

    Ok(StoryCreator::new(
        writer,
        illustrator,
        BookAssembler::new(settings.output_dir()),
    )
    .with_segmentation(*settings.segmentation()))
}
