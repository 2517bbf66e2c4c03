//! The storybook assembled during a run.

use crate::{ImageFormat, StoryConfig};
use chrono::{DateTime, Local};
use derive_getters::Getters;
use storyweaver_error::{GenerationError, GenerationErrorKind, StoryweaverResult};

/// Image bytes returned by the image service.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GeneratedImage {
    /// Encoded image
    data: Vec<u8>,
    /// Encoding of `data`
    format: ImageFormat,
}

impl GeneratedImage {
    /// Wrap encoded image bytes.
    pub fn new(data: Vec<u8>, format: ImageFormat) -> Self {
        Self { data, format }
    }
}

/// One page of the book: text plus at most one illustration.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct Page {
    /// 1-based page number
    number: usize,
    /// Story text for this page
    text: String,
    /// Names of characters mentioned on this page
    characters: Vec<String>,
    /// Prompt sent to the image service
    image_prompt: Option<String>,
    /// Illustration, once generated
    image: Option<GeneratedImage>,
}

impl Page {
    /// Create a page that has not been illustrated yet.
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            characters: Vec::new(),
            image_prompt: None,
            image: None,
        }
    }

    /// Attach the illustration and the prompt that produced it.
    pub fn illustrate(
        mut self,
        image: GeneratedImage,
        image_prompt: impl Into<String>,
        characters: Vec<String>,
    ) -> Self {
        self.image = Some(image);
        self.image_prompt = Some(image_prompt.into());
        self.characters = characters;
        self
    }

    /// Filename the illustration is stored under, e.g. `page_03.png`.
    pub fn image_filename(&self) -> Option<String> {
        self.image
            .as_ref()
            .map(|image| format!("page_{:02}.{}", self.number, image.format().extension()))
    }
}

/// The complete artifact for one run.
///
/// Built text first, then one illustrated page at a time. Page numbers
/// are kept contiguous from 1 by [`StoryBook::push_page`].
#[derive(Debug, Clone, Getters)]
pub struct StoryBook {
    /// Title derived from the opening of the story
    title: String,
    /// Story text as returned by the text service
    full_text: String,
    /// Pages in order
    pages: Vec<Page>,
    /// Configuration the book was generated from
    config: StoryConfig,
    /// The configuration exactly as it appeared in the input file
    source_config: serde_json::Value,
    /// When the run started
    created_at: DateTime<Local>,
}

impl StoryBook {
    /// Start a book with no pages.
    pub fn new(
        title: impl Into<String>,
        full_text: impl Into<String>,
        config: StoryConfig,
        source_config: serde_json::Value,
        created_at: DateTime<Local>,
    ) -> Self {
        Self {
            title: title.into(),
            full_text: full_text.into(),
            pages: Vec::new(),
            config,
            source_config,
            created_at,
        }
    }

    /// Append the next page.
    ///
    /// # Errors
    ///
    /// Fails if the page number is not the next in sequence or the book
    /// already holds the configured number of pages.
    pub fn push_page(&mut self, page: Page) -> StoryweaverResult<()> {
        let expected = self.pages.len() + 1;
        if page.number != expected || expected > self.config.page_count() {
            return Err(GenerationError::new(GenerationErrorKind::MalformedResponse(format!(
                "page {} cannot follow page {} in a {}-page book",
                page.number,
                self.pages.len(),
                self.config.page_count()
            )))
            .into());
        }
        self.pages.push(page);
        Ok(())
    }

    /// True when every configured page exists and carries an illustration.
    pub fn is_complete(&self) -> bool {
        self.pages.len() == self.config.page_count()
            && self.pages.iter().all(|page| page.image.is_some())
    }
}
