//! Book titles.

use storyweaver_core::StoryConfig;

const MAX_TITLE_CHARS: usize = 30;

/// Title taken from the story's first sentence.
///
/// Punctuation is dropped, whitespace runs become underscores and the
/// result is cut to 30 characters. Falls back to `Story_<first character>`
/// when nothing is left.
///
/// ```
/// # use storyweaver_core::{Character, Location, StoryConfig};
/// use storyweaver_pipeline::derive_title;
/// # let config = StoryConfig::builder()
/// #     .characters(vec![Character::builder().name("Sam").description("a boy").build().unwrap()])
/// #     .theme("Sharing")
/// #     .age_range("4-6")
/// #     .location(Location::builder().setting("A park").build().unwrap())
/// #     .image_style("watercolor")
/// #     .build()
/// #     .unwrap();
///
/// assert_eq!(derive_title("Sam's big day! It began.", &config), "Sams_big_day_It_began");
/// assert_eq!(derive_title("...", &config), "Story_Sam");
/// ```
pub fn derive_title(text: &str, config: &StoryConfig) -> String {
    let first_sentence = text.split('.').next().unwrap_or_default();

    let cleaned: String = first_sentence
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_' || *c == '-')
        .collect();
    let title: String = cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .trim_matches('_')
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect();

    if title.is_empty() {
        let name = config
            .characters()
            .first()
            .map(|c| c.name().as_str())
            .unwrap_or("Untitled");
        format!("Story_{}", name)
    } else {
        title
    }
}
