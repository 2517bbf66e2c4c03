//! Writes a finished book into a fresh timestamped directory.

use crate::Manifest;
use derive_getters::Getters;
use std::path::{Path, PathBuf};
use storyweaver_core::StoryBook;
use storyweaver_error::{JsonError, StorageError, StorageErrorKind, StoryweaverResult};
use tracing::{debug, info, instrument};

/// Name of the story text file inside a book directory.
pub const STORY_FILE: &str = "story.txt";

/// Name of the manifest file inside a book directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Gives up on finding a free directory name after this many suffixes.
const MAX_DIRECTORY_SUFFIX: u32 = 1000;

/// Where a book was written and what its manifest says.
#[derive(Debug, Clone, Getters)]
pub struct AssembledBook {
    /// The book directory, e.g. `output/20250412_153012`
    directory: PathBuf,
    /// The manifest as written
    manifest: Manifest,
}

/// Writes books under an output root.
///
/// Each book gets `<root>/<YYYYMMDD_HHMMSS>/`, named after the run's start
/// time. If that directory already exists a `_2`, `_3`, ... suffix is
/// appended; existing directories are never written into.
#[derive(Debug, Clone)]
pub struct BookAssembler {
    output_root: PathBuf,
}

impl BookAssembler {
    /// Create an assembler writing under `output_root`.
    ///
    /// The root is created on first use.
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
        }
    }

    /// The output root.
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Write `book` to a new directory.
    ///
    /// Writes `story.txt`, then every page image, then `manifest.json`.
    ///
    /// # Errors
    ///
    /// Fails without touching the disk if the book is incomplete. Fails with
    /// a storage error if a directory or file cannot be written; files
    /// written before the failure are left in place and no manifest is
    /// written.
    #[instrument(skip(self, book), fields(root = %self.output_root.display(), title = %book.title()))]
    pub async fn assemble(&self, book: &StoryBook) -> StoryweaverResult<AssembledBook> {
        let manifest = Manifest::from_book(book)?;

        let directory = self.create_book_directory(book).await?;

        let story = Self::render_story(book)?;
        Self::write_file(&directory.join(STORY_FILE), story.as_bytes()).await?;

        for page in book.pages() {
            if let (Some(image), Some(filename)) = (page.image(), page.image_filename()) {
                Self::write_file(&directory.join(&filename), image.data()).await?;
                debug!(page = page.number(), file = %filename, "Wrote illustration");
            }
        }

        let manifest_json = serde_json::to_string_pretty(&manifest).map_err(JsonError::from)?;
        Self::write_file(&directory.join(MANIFEST_FILE), manifest_json.as_bytes()).await?;

        info!(
            path = %directory.display(),
            pages = manifest.page_count(),
            "Book written"
        );

        Ok(AssembledBook {
            directory,
            manifest,
        })
    }

    /// Contents of `story.txt`: title, pretty-printed configuration and the
    /// full story text.
    pub fn render_story(book: &StoryBook) -> StoryweaverResult<String> {
        let config = serde_json::to_string_pretty(book.config()).map_err(JsonError::from)?;
        Ok(format!(
            "Title: {}\n\n--- Story Config ---\n{}\n\n--- Full Story Text ---\n{}\n",
            book.title(),
            config,
            book.full_text().trim_end()
        ))
    }

    async fn create_book_directory(&self, book: &StoryBook) -> StoryweaverResult<PathBuf> {
        tokio::fs::create_dir_all(&self.output_root)
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    self.output_root.display(),
                    e
                )))
            })?;

        let stamp = book.created_at().format("%Y%m%d_%H%M%S").to_string();

        for attempt in 1..=MAX_DIRECTORY_SUFFIX {
            let name = if attempt == 1 {
                stamp.clone()
            } else {
                format!("{}_{}", stamp, attempt)
            };
            let candidate = self.output_root.join(name);

            match tokio::fs::create_dir(&candidate).await {
                Ok(()) => {
                    debug!(path = %candidate.display(), "Created book directory");
                    return Ok(candidate);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(StorageError::new(StorageErrorKind::DirectoryCreation(
                        format!("{}: {}", candidate.display(), e),
                    ))
                    .into());
                }
            }
        }

        Err(StorageError::new(StorageErrorKind::DirectoryCreation(format!(
            "no free directory name for {} under {}",
            stamp,
            self.output_root.display()
        )))
        .into())
    }

    /// Write to a temp file first, then rename into place.
    async fn write_file(path: &Path, data: &[u8]) -> StoryweaverResult<()> {
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, data).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        Ok(())
    }
}
