//! The story creation run.

use crate::{
    LoadedConfig, MIN_STORY_CHARS, STORY_SYSTEM_INSTRUCTION, derive_title, illustration_prompt,
    load_story_config, reference_instructions, segment, story_prompt,
};
use chrono::Local;
use std::path::Path;
use storyweaver_core::{
    Character, ImageFormat, ImageRequest, MediaSource, Page, ReferenceImage, Segmentation,
    StoryBook, StoryConfig, TextRequest,
};
use storyweaver_error::{GenerationError, GenerationErrorKind, StoryweaverResult};
use storyweaver_interface::{Illustrator, StoryWriter};
use storyweaver_storage::{AssembledBook, BookAssembler};
use tracing::{debug, info, instrument, warn};

/// Runs configuration → story text → illustrations → output directory.
///
/// Remote calls are made one at a time: the story text first, then one
/// illustration per page in page order. The first failure ends the run
/// and nothing is written.
///
/// # Example
///
/// ```rust,ignore
/// use storyweaver_pipeline::StoryCreator;
/// use storyweaver_storage::BookAssembler;
///
/// let creator = StoryCreator::new(writer, illustrator, BookAssembler::new("output"));
/// let book = creator.create_from_file("story_config.json".as_ref()).await?;
/// println!("{}", book.directory().display());
/// ```
#[derive(Debug)]
pub struct StoryCreator<W: StoryWriter, I: Illustrator> {
    writer: W,
    illustrator: I,
    assembler: BookAssembler,
    segmentation: Segmentation,
}

impl<W: StoryWriter, I: Illustrator> StoryCreator<W, I> {
    /// Create a creator with the strict segmentation policy.
    pub fn new(writer: W, illustrator: I, assembler: BookAssembler) -> Self {
        Self {
            writer,
            illustrator,
            assembler,
            segmentation: Segmentation::default(),
        }
    }

    /// Use a different segmentation policy.
    pub fn with_segmentation(mut self, segmentation: Segmentation) -> Self {
        self.segmentation = segmentation;
        self
    }

    /// The story writer.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// The illustrator.
    pub fn illustrator(&self) -> &I {
        &self.illustrator
    }

    /// Load the configuration at `path` and create its book.
    ///
    /// # Errors
    ///
    /// Configuration errors are returned before any remote call is made.
    pub async fn create_from_file(&self, path: &Path) -> StoryweaverResult<AssembledBook> {
        let loaded = load_story_config(path)?;
        self.create(loaded).await
    }

    /// Create and write the book for a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns the first generation or storage error encountered.
    #[instrument(skip(self, loaded), fields(
        writer = self.writer.model_name(),
        illustrator = self.illustrator.model_name(),
        pages = loaded.config().page_count(),
    ))]
    pub async fn create(&self, loaded: LoadedConfig) -> StoryweaverResult<AssembledBook> {
        let created_at = Local::now();
        let (config, source) = loaded.into_parts();

        let full_text = self.write_story(&config).await?;
        let page_texts = segment(&full_text, config.page_count(), self.segmentation)?;
        let opening = page_texts.first().map(String::as_str).unwrap_or(&full_text);
        let title = derive_title(opening, &config);
        info!(title = %title, "Story text ready");

        let mut book = StoryBook::new(title, full_text, config.clone(), source, created_at);
        for (index, text) in page_texts.iter().enumerate() {
            let page = self
                .illustrate_page(&config, &page_texts, index + 1, text)
                .await?;
            book.push_page(page)?;
        }

        self.assembler.assemble(&book).await
    }

    /// Ask the writer for the whole story.
    ///
    /// # Errors
    ///
    /// Fails if the service fails or returns fewer than
    /// [`MIN_STORY_CHARS`] characters.
    #[instrument(skip(self, config))]
    pub async fn write_story(&self, config: &StoryConfig) -> StoryweaverResult<String> {
        let request = TextRequest::builder()
            .prompt(story_prompt(config))
            .system(Some(STORY_SYSTEM_INSTRUCTION.to_string()))
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::Builder(e.to_string())))?;

        info!(provider = self.writer.provider_name(), "Generating story text");
        let text = self.writer.write(&request).await?;
        let text = text.trim().to_string();

        if text.chars().count() < MIN_STORY_CHARS {
            return Err(GenerationError::new(GenerationErrorKind::EmptyResponse(format!(
                "story text is {} characters, expected at least {}",
                text.chars().count(),
                MIN_STORY_CHARS
            )))
            .into());
        }

        debug!(chars = text.chars().count(), "Story text generated");
        Ok(text)
    }

    /// Illustrate one page.
    ///
    /// Characters named in `text` are described in the prompt. Those with a
    /// readable picture are attached as references when the illustrator
    /// accepts them; missing pictures are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns the illustrator's error.
    #[instrument(skip(self, config, pages, text))]
    pub async fn illustrate_page(
        &self,
        config: &StoryConfig,
        pages: &[String],
        number: usize,
        text: &str,
    ) -> StoryweaverResult<Page> {
        let mentioned = config.characters_in(text);
        let names: Vec<String> = mentioned.iter().map(|c| c.name().clone()).collect();
        info!(page = number, characters = ?names, "Illustrating page");

        let mut prompt = illustration_prompt(config, pages, text, &mentioned);
        let mut references = self.references_for(&mentioned).await;

        if !references.is_empty() && !self.illustrator.supports_references() {
            warn!(
                page = number,
                model = self.illustrator.model_name(),
                "Illustrator does not accept reference images, generating from descriptions"
            );
            references.clear();
        }
        references.truncate(self.illustrator.max_reference_images());

        if !references.is_empty() {
            prompt = format!("{} {}", prompt, reference_instructions(&mentioned));
        }

        let request = ImageRequest::builder()
            .prompt(prompt.clone())
            .references(references)
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::Builder(e.to_string())))?;

        let image = self.illustrator.illustrate(&request).await?;
        debug!(page = number, bytes = image.data().len(), "Page illustrated");

        Ok(Page::new(number, text).illustrate(image, prompt, names))
    }

    /// Reference images for the characters that have a usable picture.
    async fn references_for(&self, characters: &[&Character]) -> Vec<ReferenceImage> {
        let supported = self.illustrator.supported_reference_formats();
        let mut references = Vec::new();

        for character in characters {
            let Some(path) = character.image_path() else {
                continue;
            };

            let is_file = tokio::fs::metadata(path)
                .await
                .map(|meta| meta.is_file())
                .unwrap_or(false);
            if !is_file {
                warn!(
                    character = %character.name(),
                    path = %path.display(),
                    "Character image not found, generating without it"
                );
                continue;
            }

            match ImageFormat::from_path(path) {
                Some(format) if supported.contains(&format) => {
                    debug!(character = %character.name(), path = %path.display(), "Found character image");
                    references.push(ReferenceImage::new(
                        character.name().clone(),
                        format,
                        MediaSource::Path(path.clone()),
                    ));
                }
                _ => warn!(
                    character = %character.name(),
                    path = %path.display(),
                    "Character image format not supported, generating without it"
                ),
            }
        }

        references
    }
}
