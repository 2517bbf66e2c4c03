//! The `manifest.json` index of a written book.

use chrono::{DateTime, Local};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use storyweaver_core::StoryBook;
use storyweaver_error::{StorageError, StorageErrorKind, StoryweaverResult};
use uuid::Uuid;

/// Compute the SHA-256 hash of data as lowercase hex.
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// One page as recorded in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct PageEntry {
    /// 1-based page number
    page: usize,
    /// Page text
    text: String,
    /// Illustration file name, relative to the book directory
    image_filename: String,
    /// Prompt sent to the image service
    image_prompt: String,
    /// Characters detected on the page
    characters: Vec<String>,
    /// SHA-256 of the illustration bytes
    sha256: String,
    /// Illustration size in bytes
    size_bytes: u64,
}

/// Index of page, image and text associations plus the source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Manifest {
    /// Unique id of this run's book
    book_id: Uuid,
    /// Book title
    title: String,
    /// When the run started
    created_at: DateTime<Local>,
    /// Configuration exactly as read from the input file
    config: serde_json::Value,
    /// Number of pages
    page_count: usize,
    /// Pages in order
    pages: Vec<PageEntry>,
}

impl Manifest {
    /// Build the manifest of a complete book.
    ///
    /// # Errors
    ///
    /// Fails with [`StorageErrorKind::IncompleteBook`] if any page lacks an
    /// illustration or the page count is short.
    pub fn from_book(book: &StoryBook) -> StoryweaverResult<Self> {
        if !book.is_complete() {
            return Err(StorageError::new(StorageErrorKind::IncompleteBook(format!(
                "'{}' has {} of {} illustrated pages",
                book.title(),
                book.pages().iter().filter(|p| p.image().is_some()).count(),
                book.config().page_count()
            )))
            .into());
        }

        let mut pages = Vec::with_capacity(book.pages().len());
        for page in book.pages() {
            let (Some(image), Some(image_filename)) = (page.image(), page.image_filename()) else {
                return Err(StorageError::new(StorageErrorKind::IncompleteBook(format!(
                    "page {} has no illustration",
                    page.number()
                )))
                .into());
            };
            pages.push(PageEntry {
                page: *page.number(),
                text: page.text().clone(),
                image_filename,
                image_prompt: page.image_prompt().clone().unwrap_or_default(),
                characters: page.characters().clone(),
                sha256: content_hash(image.data()),
                size_bytes: image.data().len() as u64,
            });
        }

        Ok(Self {
            book_id: Uuid::new_v4(),
            title: book.title().clone(),
            created_at: *book.created_at(),
            config: book.source_config().clone(),
            page_count: pages.len(),
            pages,
        })
    }
}
