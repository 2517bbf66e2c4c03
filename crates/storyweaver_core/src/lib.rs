//! Core data types for Storyweaver.
//!
//! This crate holds the story description read from disk ([`StoryConfig`]),
//! the artifact assembled during a run ([`StoryBook`], [`Page`]), the
//! provider-neutral request types handed to the remote services, and the
//! runtime [`Settings`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod book;
mod credentials;
mod media;
mod request;
mod settings;
mod story;

pub use book::{GeneratedImage, Page, StoryBook};
pub use credentials::{Credentials, GEMINI_API_KEY, OPENAI_API_KEY};
pub use media::{ImageFormat, MediaSource};
pub use request::{
    ImageRequest, ImageRequestBuilder, ReferenceImage, TextRequest, TextRequestBuilder,
};
pub use settings::{ImageSettings, RetrySettings, Segmentation, Settings, TextSettings};
pub use story::{
    Character, CharacterBuilder, DEFAULT_PAGES, Location, LocationBuilder, MAX_PAGES, MIN_PAGES,
    StoryConfig, StoryConfigBuilder,
};
