//! End-to-end tests of the story creation run with in-process services.

mod test_utils;

use serde_json::json;
use std::path::Path;
use storyweaver_core::Segmentation;
use storyweaver_error::{GenerationErrorKind, StoryweaverErrorKind};
use storyweaver_pipeline::{STORY_SYSTEM_INSTRUCTION, StoryCreator, reference_instructions};
use storyweaver_storage::{BookAssembler, MANIFEST_FILE, Manifest, STORY_FILE};
use tempfile::TempDir;
use test_utils::{MockIllustrator, MockWriter, delimited_story, write_config};

const THEME: &str = "Teamwork and protecting the environment";

/// Sam has a picture on disk, Tika does not.
fn sam_and_tika(dir: &Path, pages: u32) -> serde_json::Value {
    let sam_image = dir.join("sam.png");
    std::fs::write(&sam_image, [0x89, b'P', b'N', b'G']).unwrap();

    json!({
        "characters": [
            {
                "name": "Sam",
                "description": "a cheerful boy with a red cap",
                "image_path": sam_image.to_string_lossy()
            },
            {
                "name": "Tika",
                "description": "a wise old sea turtle"
            }
        ],
        "theme": THEME,
        "age_range": "4-6",
        "location": {
            "setting": "A sunny beach",
            "details": ["tide pools", "a lighthouse"]
        },
        "story_length_pages": pages,
        "image_style": "soft watercolor"
    })
}

const TEN_PAGE_CAST: [&[&str]; 10] = [
    &["Sam"],
    &["Tika"],
    &["Sam", "Tika"],
    &[],
    &["Sam"],
    &["Tika"],
    &[],
    &["Sam", "Tika"],
    &["Tika"],
    &["Sam"],
];

fn creator(
    root: &Path,
    writer: &MockWriter,
    illustrator: &MockIllustrator,
) -> StoryCreator<MockWriter, MockIllustrator> {
    StoryCreator::new(
        writer.clone(),
        illustrator.clone(),
        BookAssembler::new(root.join("output")),
    )
}

#[tokio::test]
async fn test_sam_and_tika_ten_page_book() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let input = sam_and_tika(temp_dir.path(), 10);
    let config_path = write_config(temp_dir.path(), &input);

    let writer = MockWriter::new_success(delimited_story(&TEN_PAGE_CAST));
    let illustrator = MockIllustrator::new();
    let book = creator(temp_dir.path(), &writer, &illustrator)
        .create_from_file(&config_path)
        .await?;

    assert_eq!(writer.call_count(), 1);
    assert_eq!(illustrator.call_count(), 10);

    let dir = book.directory();
    for number in 1..=10 {
        assert!(dir.join(format!("page_{:02}.png", number)).is_file());
    }
    assert!(dir.join(STORY_FILE).is_file());

    let manifest: Manifest =
        serde_json::from_str(&std::fs::read_to_string(dir.join(MANIFEST_FILE))?)?;
    assert_eq!(*manifest.page_count(), 10);
    assert_eq!(manifest.pages().len(), 10);
    assert_eq!(manifest.config(), &input);
    assert_eq!(manifest.config()["theme"], THEME);

    for (entry, cast) in manifest.pages().iter().zip(TEN_PAGE_CAST.iter()) {
        let expected: Vec<String> = cast.iter().map(|name| name.to_string()).collect();
        assert_eq!(entry.characters(), &expected);
        assert!(entry.text().starts_with(&format!("Page {}", entry.page())));
    }
    Ok(())
}

#[tokio::test]
async fn test_manifest_keeps_input_key_order() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("story_config.json");
    std::fs::write(
        &config_path,
        r#"{
  "theme": "Sharing",
  "characters": [
    { "name": "Tika", "description": "a wise old sea turtle" }
  ],
  "story_length_pages": 4,
  "location": { "setting": "A sunny beach", "details": ["tide pools"] },
  "image_style": "soft watercolor",
  "age_range": "4-6"
}"#,
    )?;

    let cast: [&[&str]; 4] = [&["Tika"], &[], &["Tika"], &[]];
    let writer = MockWriter::new_success(delimited_story(&cast));
    let illustrator = MockIllustrator::new();
    let book = creator(temp_dir.path(), &writer, &illustrator)
        .create_from_file(&config_path)
        .await?;

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(book.directory().join(MANIFEST_FILE))?)?;
    let config = &written["config"];

    let keys: Vec<&str> = config
        .as_object()
        .map(|object| object.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(
        keys,
        vec![
            "theme",
            "characters",
            "story_length_pages",
            "location",
            "image_style",
            "age_range"
        ]
    );

    let character_keys: Vec<&str> = config["characters"][0]
        .as_object()
        .map(|object| object.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(character_keys, vec!["name", "description"]);

    let location_keys: Vec<&str> = config["location"]
        .as_object()
        .map(|object| object.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert_eq!(location_keys, vec!["setting", "details"]);
    Ok(())
}

#[tokio::test]
async fn test_references_follow_character_mentions() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = write_config(temp_dir.path(), &sam_and_tika(temp_dir.path(), 10));

    let writer = MockWriter::new_success(delimited_story(&TEN_PAGE_CAST));
    let illustrator = MockIllustrator::new();
    creator(temp_dir.path(), &writer, &illustrator)
        .create_from_file(&config_path)
        .await?;

    let requests = illustrator.requests();
    assert_eq!(requests.len(), 10);
    for (request, cast) in requests.iter().zip(TEN_PAGE_CAST.iter()) {
        let mentions_sam = cast.contains(&"Sam");
        assert_eq!(request.has_references(), mentions_sam);
        assert!(
            request
                .references()
                .iter()
                .all(|reference| reference.character() == "Sam")
        );
        assert_eq!(
            request.prompt().contains("Combine the character(s)"),
            mentions_sam
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_prompts_describe_page_characters() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = write_config(temp_dir.path(), &sam_and_tika(temp_dir.path(), 10));

    let writer = MockWriter::new_success(delimited_story(&TEN_PAGE_CAST));
    let illustrator = MockIllustrator::new();
    creator(temp_dir.path(), &writer, &illustrator)
        .create_from_file(&config_path)
        .await?;

    let story_request = writer.requests()[0].clone();
    assert_eq!(
        story_request.system().as_deref(),
        Some(STORY_SYSTEM_INSTRUCTION)
    );
    let story_prompt = story_request.prompt().clone();
    assert!(story_prompt.contains(THEME));
    assert!(story_prompt.contains("- Tika: a wise old sea turtle"));
    assert!(story_prompt.contains("exactly 10 pages"));

    let requests = illustrator.requests();
    assert!(requests[1].prompt().contains("Tika (a wise old sea turtle)"));
    assert!(!requests[1].prompt().contains("Sam (a cheerful boy"));
    assert!(requests[3].prompt().contains("None mentioned on this page."));
    assert!(requests[0].prompt().contains("Style: soft watercolor."));
    Ok(())
}

#[tokio::test]
async fn test_illustrator_without_reference_support_gets_none() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = write_config(temp_dir.path(), &sam_and_tika(temp_dir.path(), 10));

    let writer = MockWriter::new_success(delimited_story(&TEN_PAGE_CAST));
    let illustrator = MockIllustrator::without_references();
    creator(temp_dir.path(), &writer, &illustrator)
        .create_from_file(&config_path)
        .await?;

    assert!(illustrator.requests().iter().all(|r| !r.has_references()));
    Ok(())
}

#[tokio::test]
async fn test_missing_reference_file_is_skipped() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let mut input = sam_and_tika(temp_dir.path(), 10);
    input["characters"][1]["image_path"] = json!(temp_dir.path().join("no_such_tika.png"));
    let config_path = write_config(temp_dir.path(), &input);

    let writer = MockWriter::new_success(delimited_story(&TEN_PAGE_CAST));
    let illustrator = MockIllustrator::new();
    let book = creator(temp_dir.path(), &writer, &illustrator)
        .create_from_file(&config_path)
        .await?;

    assert_eq!(*book.manifest().page_count(), 10);
    let requests = illustrator.requests();
    // Page 2 mentions only Tika
    assert!(!requests[1].has_references());
    // Page 3 mentions both; only Sam's picture exists
    assert_eq!(requests[2].references().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_missing_characters_fails_before_remote_calls() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let mut without = sam_and_tika(temp_dir.path(), 10);
    without.as_object_mut().unwrap().remove("characters");
    let mut empty = sam_and_tika(temp_dir.path(), 10);
    empty["characters"] = json!([]);

    for input in [without, empty] {
        let config_path = write_config(temp_dir.path(), &input);
        let writer = MockWriter::new_success(delimited_story(&TEN_PAGE_CAST));
        let illustrator = MockIllustrator::new();

        let err = creator(temp_dir.path(), &writer, &illustrator)
            .create_from_file(&config_path)
            .await
            .unwrap_err();

        assert!(err.is_config());
        assert_eq!(writer.call_count(), 0);
        assert_eq!(illustrator.call_count(), 0);
    }
    Ok(())
}

#[tokio::test]
async fn test_page_count_out_of_range_is_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    for pages in [0, 25] {
        let config_path = write_config(temp_dir.path(), &sam_and_tika(temp_dir.path(), pages));
        let writer = MockWriter::new_success(delimited_story(&TEN_PAGE_CAST));
        let illustrator = MockIllustrator::new();

        let err = creator(temp_dir.path(), &writer, &illustrator)
            .create_from_file(&config_path)
            .await
            .unwrap_err();

        assert!(err.is_config(), "{} pages should be rejected", pages);
        assert_eq!(writer.call_count(), 0);
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_config_file_is_a_config_error() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let writer = MockWriter::new_success("unused");
    let illustrator = MockIllustrator::new();

    let err = creator(temp_dir.path(), &writer, &illustrator)
        .create_from_file(&temp_dir.path().join("absent.json"))
        .await
        .unwrap_err();

    assert!(err.is_config());
    Ok(())
}

#[tokio::test]
async fn test_text_failure_writes_no_manifest() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = write_config(temp_dir.path(), &sam_and_tika(temp_dir.path(), 10));

    let writer = MockWriter::new_error(GenerationErrorKind::HttpStatus {
        status_code: 503,
        message: "overloaded".to_string(),
    });
    let illustrator = MockIllustrator::new();
    let err = creator(temp_dir.path(), &writer, &illustrator)
        .create_from_file(&config_path)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), StoryweaverErrorKind::Generation(_)));
    assert_eq!(writer.call_count(), 1);
    assert_eq!(illustrator.call_count(), 0);
    assert!(!temp_dir.path().join("output").exists());
    Ok(())
}

#[tokio::test]
async fn test_illustration_failure_stops_the_run() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = write_config(temp_dir.path(), &sam_and_tika(temp_dir.path(), 10));

    let writer = MockWriter::new_success(delimited_story(&TEN_PAGE_CAST));
    let illustrator = MockIllustrator::failing_on(3);
    let err = creator(temp_dir.path(), &writer, &illustrator)
        .create_from_file(&config_path)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), StoryweaverErrorKind::Generation(_)));
    assert_eq!(illustrator.call_count(), 3);
    assert!(!temp_dir.path().join("output").exists());
    Ok(())
}

#[tokio::test]
async fn test_short_story_is_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = write_config(temp_dir.path(), &sam_and_tika(temp_dir.path(), 4));

    let writer = MockWriter::new_success("Sam swam.");
    let illustrator = MockIllustrator::new();
    let err = creator(temp_dir.path(), &writer, &illustrator)
        .create_from_file(&config_path)
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), StoryweaverErrorKind::Generation(_)));
    assert_eq!(illustrator.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_strict_segmentation_rejects_wrong_page_count() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = write_config(temp_dir.path(), &sam_and_tika(temp_dir.path(), 10));

    let writer = MockWriter::new_success(delimited_story(&TEN_PAGE_CAST[..7]));
    let illustrator = MockIllustrator::new();
    let err = creator(temp_dir.path(), &writer, &illustrator)
        .create_from_file(&config_path)
        .await
        .unwrap_err();

    match err.kind() {
        StoryweaverErrorKind::Generation(e) => assert_eq!(
            e.kind,
            GenerationErrorKind::PageCountMismatch {
                expected: 10,
                actual: 7
            }
        ),
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(illustrator.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_reconcile_segmentation_fits_paragraphs_to_pages() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = write_config(temp_dir.path(), &sam_and_tika(temp_dir.path(), 4));

    let story = "Sam found a plastic bag on the sand. Tika was tangled in a net.\n\n\
                 Sam cut the net free. Tika thanked him with a slow smile.\n\n\
                 Together they cleaned the beach until sunset.";
    let writer = MockWriter::new_success(story);
    let illustrator = MockIllustrator::new();
    let book = creator(temp_dir.path(), &writer, &illustrator)
        .with_segmentation(Segmentation::Reconcile)
        .create_from_file(&config_path)
        .await?;

    assert_eq!(*book.manifest().page_count(), 4);
    assert_eq!(illustrator.call_count(), 4);
    Ok(())
}

#[test]
fn test_reference_instructions_without_characters() {
    let instructions = reference_instructions(&[]);
    assert!(instructions.contains("None mentioned on this page."));
}
