//! Prompt text for the text and image services.

use storyweaver_core::{Character, StoryConfig};

/// Line separating pages in generated story text.
pub const PAGE_DELIMITER: &str = "---";

/// Generated stories shorter than this are rejected.
pub const MIN_STORY_CHARS: usize = 50;

/// System instruction sent with the story prompt.
pub const STORY_SYSTEM_INSTRUCTION: &str = "You are a children's picture-book author. \
Write warm, gentle stories in short sentences that a parent can read aloud.";

/// Character list used when nobody is named on a page.
pub const NO_CHARACTERS: &str = "None mentioned on this page.";

/// Prompt asking for the whole story, one `---`-separated block per page.
///
/// # Examples
///
/// ```
/// use storyweaver_core::{Character, Location, StoryConfig};
/// use storyweaver_pipeline::story_prompt;
///
/// let config = StoryConfig::builder()
///     .characters(vec![Character::builder()
///         .name("Sam")
///         .description("a curious boy")
///         .build()
///         .unwrap()])
///     .theme("Sharing")
///     .age_range("4-6")
///     .location(Location::builder().setting("A park").build().unwrap())
///     .story_length_pages(5u32)
///     .image_style("watercolor")
///     .build()
///     .unwrap();
///
/// let prompt = story_prompt(&config);
/// assert!(prompt.contains("- Sam: a curious boy"));
/// assert!(prompt.contains("exactly 5 pages"));
/// ```
pub fn story_prompt(config: &StoryConfig) -> String {
    let characters = config
        .characters()
        .iter()
        .map(|c| format!("- {}: {}", c.name(), c.description()))
        .collect::<Vec<_>>()
        .join("\n");
    let pages = config.story_length_pages();

    format!(
        "Write a children's story suitable for the age range {age}.\n\
         Theme: {theme}\n\
         Characters:\n{characters}\n\
         Location: {location}\n\
         The story should be engaging, positive, and exactly {pages} pages long, \
         with one short paragraph per page.\n\
         Ensure the story has a clear beginning, middle, and a gentle resolution or end.\n\
         Use simple language appropriate for the age group.\n\
         Focus on the interactions between the characters and their environment.\n\
         Separate consecutive pages with a line containing only {delimiter} and nothing else.\n\
         Do NOT include a title, page numbers, or labels like '[Page X]'. \
         Output only the story text and the {delimiter} separators.",
        age = config.age_range(),
        theme = config.theme(),
        characters = characters,
        location = config.location().describe(),
        pages = pages,
        delimiter = PAGE_DELIMITER,
    )
}

/// Mentioned characters as `Name (description)`, comma separated.
pub fn character_details(characters: &[&Character]) -> String {
    if characters.is_empty() {
        return NO_CHARACTERS.to_string();
    }
    characters
        .iter()
        .map(|c| format!("{} ({})", c.name(), c.description()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prompt for one page's illustration.
///
/// # Arguments
///
/// * `config` - Story configuration
/// * `pages` - Text of every page, for context
/// * `page_text` - Text of the page being illustrated
/// * `characters` - Characters named on this page
pub fn illustration_prompt(
    config: &StoryConfig,
    pages: &[String],
    page_text: &str,
    characters: &[&Character],
) -> String {
    format!(
        "You will generate a page for a children's book. I'll give you some metadata, \
         the full text of the book, and the text for this specific page.\n\
         Style: {style}.\n\
         Setting: {setting}. Theme: {theme}.\n\
         Age: {age}. Story context: {context}\n\
         This specific page shows: {page_text}\n\
         Characters mentioned on this page (use descriptions): {characters}\n\
         Incorporate the page text '{page_text}' visually into the image using the Andika \
         font from Google Fonts, perhaps on a sign, scroll, or subtly in the background.",
        style = config.image_style(),
        setting = config.location().describe(),
        theme = config.theme(),
        age = config.age_range(),
        context = pages.join(" "),
        page_text = page_text,
        characters = character_details(characters),
    )
}

/// Extra instructions appended when character pictures are attached.
pub fn reference_instructions(characters: &[&Character]) -> String {
    format!(
        "Combine the character(s) from the input image(s) into the scene described above, \
         maintaining the overall style. Preserve the key characteristics of the characters \
         (as described: {}), but make them look like they are naturally part of the scene \
         depicted in the page text.",
        character_details(characters)
    )
}
