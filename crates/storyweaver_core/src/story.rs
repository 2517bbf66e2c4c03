//! Story configuration types.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use storyweaver_error::{ConfigError, StoryweaverResult};

/// Smallest accepted `story_length_pages`.
pub const MIN_PAGES: u32 = 4;
/// Largest accepted `story_length_pages`.
pub const MAX_PAGES: u32 = 20;
/// Page count used when the configuration omits `story_length_pages`.
pub const DEFAULT_PAGES: u32 = 8;

fn default_pages() -> u32 {
    DEFAULT_PAGES
}

/// A character appearing in the story.
///
/// # Examples
///
/// ```
/// use storyweaver_core::Character;
///
/// let sam = Character::builder()
///     .name("Sam")
///     .description("a curious boy with a green backpack")
///     .build()
///     .unwrap();
///
/// assert_eq!(sam.name(), "Sam");
/// assert!(sam.image_path().is_none());
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct Character {
    /// Name, unique within a story
    name: String,
    /// Appearance and personality used in prompts
    description: String,
    /// Optional picture of the character used to ground illustrations
    #[builder(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_path: Option<PathBuf>,
}

impl Character {
    /// Create a new builder.
    pub fn builder() -> CharacterBuilder {
        CharacterBuilder::default()
    }

    /// True when the character's name occurs in `text`, ignoring case.
    pub fn appears_in(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.name.to_lowercase())
    }
}

/// Where the story takes place.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct Location {
    /// Short description of the setting
    setting: String,
    /// Ordered details of the setting
    #[builder(default)]
    #[serde(default)]
    details: Vec<String>,
}

impl Location {
    /// Create a new builder.
    pub fn builder() -> LocationBuilder {
        LocationBuilder::default()
    }

    /// Setting and details rendered as a single sentence.
    ///
    /// ```
    /// use storyweaver_core::Location;
    ///
    /// let location = Location::builder()
    ///     .setting("A sunny beach")
    ///     .details(vec!["tide pools".to_string(), "a lighthouse".to_string()])
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(location.describe(), "A sunny beach, featuring tide pools, a lighthouse.");
    /// ```
    pub fn describe(&self) -> String {
        if self.details.is_empty() {
            format!("{}.", self.setting)
        } else {
            format!("{}, featuring {}.", self.setting, self.details.join(", "))
        }
    }
}

/// The validated description of the story to generate.
///
/// Loaded once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct StoryConfig {
    /// Characters in the order they were listed
    characters: Vec<Character>,
    /// Theme or moral of the story
    theme: String,
    /// Target reader age, e.g. "4-6"
    age_range: String,
    /// Setting of the story
    location: Location,
    /// Number of pages, each with one illustration
    #[builder(default = "DEFAULT_PAGES")]
    #[serde(default = "default_pages")]
    story_length_pages: u32,
    /// Art style requested for every illustration
    image_style: String,
}

impl StoryConfig {
    /// Create a new builder.
    pub fn builder() -> StoryConfigBuilder {
        StoryConfigBuilder::default()
    }

    /// Requested page count as a length.
    pub fn page_count(&self) -> usize {
        self.story_length_pages as usize
    }

    /// Characters whose names appear in `text`, in configuration order.
    pub fn characters_in(&self, text: &str) -> Vec<&Character> {
        self.characters
            .iter()
            .filter(|c| c.appears_in(text))
            .collect()
    }

    /// Check required fields and bounds.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the character list is empty, a
    /// character lacks a name or description, two characters share a name,
    /// or the page count lies outside `MIN_PAGES..=MAX_PAGES`.
    pub fn validate(&self) -> StoryweaverResult<()> {
        if self.characters.is_empty() {
            return Err(ConfigError::new("characters must contain at least one character").into());
        }

        let mut seen = HashSet::new();
        for (index, character) in self.characters.iter().enumerate() {
            if character.name.trim().is_empty() {
                return Err(
                    ConfigError::new(format!("characters[{}].name must not be empty", index))
                        .into(),
                );
            }
            if character.description.trim().is_empty() {
                return Err(ConfigError::new(format!(
                    "characters[{}].description must not be empty ({})",
                    index, character.name
                ))
                .into());
            }
            if !seen.insert(character.name.trim().to_lowercase()) {
                return Err(ConfigError::new(format!(
                    "duplicate character name: {}",
                    character.name
                ))
                .into());
            }
        }

        if !(MIN_PAGES..=MAX_PAGES).contains(&self.story_length_pages) {
            return Err(ConfigError::new(format!(
                "story_length_pages must be between {} and {}, got {}",
                MIN_PAGES, MAX_PAGES, self.story_length_pages
            ))
            .into());
        }

        Ok(())
    }
}
