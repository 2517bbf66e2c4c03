//! Runtime settings for the generation services and output.
//!
//! Settings are layered with the `config` crate:
//! 1. Bundled defaults (`storyweaver.toml` shipped with the crate)
//! 2. `~/.config/storyweaver/storyweaver.toml`
//! 3. `./storyweaver.toml`
//! 4. A file named on the command line
//!
//! Later sources override earlier ones; only the last is required to exist.

use crate::ImageFormat;
use config::{Config, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storyweaver_error::{ConfigError, StoryweaverError, StoryweaverResult};
use tracing::{debug, instrument};

const DEFAULT_SETTINGS: &str = include_str!("../../../storyweaver.toml");

/// How generated prose is divided into pages when its natural segments
/// do not match the requested page count.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Segmentation {
    /// Fail the run on any mismatch
    #[default]
    Strict,
    /// Merge short or split long segments until the count matches
    Reconcile,
}

/// Text service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct TextSettings {
    /// Gemini model name
    model: String,
    /// Sampling temperature
    #[serde(default)]
    temperature: Option<f32>,
    /// Output token cap
    #[serde(default)]
    max_output_tokens: Option<u32>,
}

/// Image service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct ImageSettings {
    /// OpenAI image model name
    model: String,
    /// Illustration size, e.g. "1536x1024"
    size: String,
    /// Quality hint ("low", "medium", "high", "auto")
    #[serde(default)]
    quality: Option<String>,
    /// Requested encoding; the service default (PNG) when unset
    #[serde(default)]
    output_format: Option<ImageFormat>,
    /// API root, without a trailing slash
    base_url: String,
}

/// Opt-in retry of transient service errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RetrySettings {
    /// Retries after the first attempt; zero disables retrying
    max_retries: usize,
    /// First backoff delay
    initial_backoff_ms: u64,
    /// Backoff ceiling
    max_delay_secs: u64,
}

impl RetrySettings {
    /// Build retry settings.
    pub fn new(max_retries: usize, initial_backoff_ms: u64, max_delay_secs: u64) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_delay_secs,
        }
    }

    /// Settings that make exactly one attempt.
    pub fn disabled() -> Self {
        Self::new(0, 2000, 60)
    }
}

/// All runtime settings.
///
/// # Example
///
/// ```no_run
/// use storyweaver_core::Settings;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = Settings::load(None)?;
/// println!("writing books to {}", settings.output_dir().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Settings {
    /// Parent directory of the per-run output directories
    output_dir: PathBuf,
    /// Page segmentation policy
    #[serde(default)]
    segmentation: Segmentation,
    /// Text service settings
    text: TextSettings,
    /// Image service settings
    image: ImageSettings,
    /// Retry settings shared by both services
    retry: RetrySettings,
}

fn config_error(context: &str, err: config::ConfigError) -> StoryweaverError {
    ConfigError::new(format!("{}: {}", context, err)).into()
}

impl Settings {
    /// The bundled defaults, ignoring any user files.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled file itself is broken.
    pub fn bundled() -> StoryweaverResult<Self> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml))
            .build()
            .map_err(|e| config_error("Failed to read bundled settings", e))?
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse bundled settings", e))
    }

    /// Load settings with user overrides applied.
    ///
    /// # Arguments
    ///
    /// * `explicit` - Optional settings file that must exist
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `explicit` cannot be read or any
    /// source fails to parse.
    #[instrument]
    pub fn load(explicit: Option<&Path>) -> StoryweaverResult<Self> {
        debug!("Loading settings: explicit > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_settings = home.join(".config/storyweaver/storyweaver.toml");
            builder = builder.add_source(File::from(home_settings).required(false));
        }

        builder = builder.add_source(File::with_name("storyweaver").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .build()
            .map_err(|e| config_error("Failed to build settings", e))?
            .try_deserialize()
            .map_err(|e| config_error("Failed to parse settings", e))
    }

    /// Replace the output directory (e.g. from a command-line flag).
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Replace the image service root (used to point at a local stub).
    pub fn with_image_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.image.base_url = base_url.into();
        self
    }
}
