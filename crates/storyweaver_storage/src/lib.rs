//! Output writer for finished storybooks.
//!
//! A [`BookAssembler`] turns a complete [`StoryBook`](storyweaver_core::StoryBook)
//! into a directory on disk:
//!
//! ```text
//! output/
//! └── 20250412_153012/
//!     ├── story.txt
//!     ├── page_01.png
//!     ├── ...
//!     ├── page_10.png
//!     └── manifest.json   (written last)
//! ```
//!
//! Files are written one at a time, each through a temporary file and a
//! rename. The manifest goes last, so a directory without `manifest.json`
//! holds an incomplete book.
//!
//! # Example
//!
//! ```no_run
//! use storyweaver_storage::BookAssembler;
//! # use storyweaver_core::StoryBook;
//!
//! # async fn example(book: StoryBook) -> Result<(), Box<dyn std::error::Error>> {
//! let assembler = BookAssembler::new("output");
//! let assembled = assembler.assemble(&book).await?;
//! println!("wrote {}", assembled.directory().display());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assembler;
mod manifest;

pub use assembler::{AssembledBook, BookAssembler, MANIFEST_FILE, STORY_FILE};
pub use manifest::{Manifest, PageEntry, content_hash};
pub use storyweaver_error::{StorageError, StorageErrorKind};
