//! Trait definitions for Storyweaver's remote services.
//!
//! The pipeline only talks to [`StoryWriter`] and [`Illustrator`], so tests
//! can substitute in-process fakes for the hosted models.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{Illustrator, StoryWriter};
