//! API credentials read from the environment.

use storyweaver_error::{ConfigError, StoryweaverResult};

/// Environment variable holding the text service key.
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
/// Environment variable holding the image service key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Keys for the two remote services.
#[derive(Clone)]
pub struct Credentials {
    gemini_api_key: String,
    openai_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("gemini_api_key", &"<redacted>")
            .field("openai_api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Build credentials from explicit keys.
    pub fn new(gemini_api_key: impl Into<String>, openai_api_key: impl Into<String>) -> Self {
        Self {
            gemini_api_key: gemini_api_key.into(),
            openai_api_key: openai_api_key.into(),
        }
    }

    /// Read both keys from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming every variable that is unset or
    /// empty.
    pub fn from_env() -> StoryweaverResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read both keys through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoryweaverResult<Self> {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let gemini = read(GEMINI_API_KEY);
        let openai = read(OPENAI_API_KEY);

        match (gemini, openai) {
            (Some(gemini_api_key), Some(openai_api_key)) => Ok(Self {
                gemini_api_key,
                openai_api_key,
            }),
            (gemini, openai) => {
                let missing: Vec<&str> = [
                    gemini.is_none().then_some(GEMINI_API_KEY),
                    openai.is_none().then_some(OPENAI_API_KEY),
                ]
                .into_iter()
                .flatten()
                .collect();
                Err(ConfigError::new(format!(
                    "missing API credentials: {} (set them in the environment or a .env file)",
                    missing.join(", ")
                ))
                .into())
            }
        }
    }

    /// Text service key.
    pub fn gemini_api_key(&self) -> &str {
        &self.gemini_api_key
    }

    /// Image service key.
    pub fn openai_api_key(&self) -> &str {
        &self.openai_api_key
    }
}
