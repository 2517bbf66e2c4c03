//! Storybook generation pipeline.
//!
//! A run moves strictly forward through four stages:
//!
//! 1. [`load_story_config`] reads and validates the story description.
//! 2. [`StoryCreator`] asks a [`StoryWriter`](storyweaver_interface::StoryWriter)
//!    for `---`-delimited prose and [`segment`]s it into pages.
//! 3. Each page is illustrated by an
//!    [`Illustrator`](storyweaver_interface::Illustrator), one at a time.
//! 4. The finished book is handed to a
//!    [`BookAssembler`](storyweaver_storage::BookAssembler).
//!
//! The first failure ends the run; nothing is written until every page
//! has its illustration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod creator;
mod loader;
mod prompt;
mod segment;
mod title;

pub use creator::StoryCreator;
pub use loader::{LoadedConfig, load_story_config, parse_story_config};
pub use prompt::{
    MIN_STORY_CHARS, NO_CHARACTERS, PAGE_DELIMITER, STORY_SYSTEM_INSTRUCTION, character_details,
    illustration_prompt, reference_instructions, story_prompt,
};
pub use segment::{reconcile, segment, split_segments};
pub use title::derive_title;
