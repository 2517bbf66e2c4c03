//! Story configuration loading.

use derive_getters::Getters;
use std::path::Path;
use storyweaver_core::StoryConfig;
use storyweaver_error::{ConfigError, StoryweaverResult};
use tracing::{debug, info, instrument};

/// A validated configuration together with the JSON it was read from.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct LoadedConfig {
    /// Validated configuration
    config: StoryConfig,
    /// The input document exactly as parsed, recorded in the manifest
    source: serde_json::Value,
}

impl LoadedConfig {
    /// Split into the configuration and its source JSON.
    pub fn into_parts(self) -> (StoryConfig, serde_json::Value) {
        (self.config, self.source)
    }
}

/// Read and validate a story configuration file.
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read, is not a
/// JSON object, lacks required fields, or fails validation.
#[instrument(fields(path = %path.display()))]
pub fn load_story_config(path: &Path) -> StoryweaverResult<LoadedConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::new(format!(
            "cannot read story configuration {}: {}",
            path.display(),
            e
        ))
    })?;

    let loaded = parse_story_config(&contents).map_err(|e| {
        ConfigError::new(format!("{}: {}", path.display(), e))
    })?;

    info!(
        pages = loaded.config.story_length_pages(),
        characters = loaded.config.characters().len(),
        "Loaded story configuration"
    );
    Ok(loaded)
}

/// Parse and validate a story configuration document.
///
/// # Errors
///
/// Returns a configuration error if `json` is not a JSON object, lacks
/// required fields, or fails validation.
///
/// # Examples
///
/// ```
/// use storyweaver_pipeline::parse_story_config;
///
/// let loaded = parse_story_config(r#"{
///     "characters": [{ "name": "Sam", "description": "a curious boy" }],
///     "theme": "Sharing",
///     "age_range": "4-6",
///     "location": { "setting": "A park" },
///     "image_style": "watercolor"
/// }"#).unwrap();
///
/// assert_eq!(*loaded.config().story_length_pages(), 8);
/// assert!(loaded.config().location().details().is_empty());
/// ```
pub fn parse_story_config(json: &str) -> StoryweaverResult<LoadedConfig> {
    let source: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| ConfigError::new(format!("invalid JSON: {}", e)))?;

    if !source.is_object() {
        return Err(ConfigError::new("story configuration must be a JSON object").into());
    }

    let config: StoryConfig = serde_json::from_value(source.clone())
        .map_err(|e| ConfigError::new(format!("invalid story configuration: {}", e)))?;
    config.validate()?;

    debug!(theme = %config.theme(), "Story configuration validated");
    Ok(LoadedConfig { config, source })
}
