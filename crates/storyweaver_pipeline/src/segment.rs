//! Dividing generated story text into pages.
//!
//! Text containing `---` delimiter lines is split on them. Otherwise
//! blank lines separate paragraphs and each paragraph is a segment.
//! When the count differs from the requested page count the policy
//! decides: [`Segmentation::Strict`] fails, [`Segmentation::Reconcile`]
//! merges and splits segments until the count matches.

use crate::PAGE_DELIMITER;
use storyweaver_core::Segmentation;
use storyweaver_error::{GenerationError, GenerationErrorKind, StoryweaverResult};
use tracing::{debug, warn};

/// Split story text into exactly `expected` pages.
///
/// # Errors
///
/// Returns [`GenerationErrorKind::PageCountMismatch`] when the segment
/// count cannot be brought to `expected` under `policy`.
///
/// # Examples
///
/// ```
/// use storyweaver_core::Segmentation;
/// use storyweaver_pipeline::segment;
///
/// let text = "Sam woke up.\n---\nSam went outside.\n---\nSam met Tika.";
/// let pages = segment(text, 3, Segmentation::Strict).unwrap();
/// assert_eq!(pages[2], "Sam met Tika.");
///
/// assert!(segment(text, 4, Segmentation::Strict).is_err());
/// ```
pub fn segment(text: &str, expected: usize, policy: Segmentation) -> StoryweaverResult<Vec<String>> {
    let segments = split_segments(text);
    let actual = segments.len();
    debug!(expected, actual, %policy, "Segmented story text");

    if actual == expected {
        return Ok(segments);
    }

    let mismatch = || {
        GenerationError::new(GenerationErrorKind::PageCountMismatch { expected, actual })
    };

    match policy {
        Segmentation::Strict => Err(mismatch().into()),
        Segmentation::Reconcile => {
            warn!(expected, actual, "Page count mismatch, reconciling segments");
            reconcile(segments, expected).ok_or_else(|| mismatch().into())
        }
    }
}

/// Split text on delimiter lines, or on blank lines when there are none.
///
/// Segments are trimmed and empty ones dropped.
pub fn split_segments(text: &str) -> Vec<String> {
    let delimited = text.lines().any(|line| line.trim() == PAGE_DELIMITER);
    let is_break = |line: &str| {
        if delimited {
            line.trim() == PAGE_DELIMITER
        } else {
            line.trim().is_empty()
        }
    };

    let mut segments = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if is_break(line) {
            push_segment(&mut segments, &current);
            current.clear();
        } else {
            current.push(line);
        }
    }
    push_segment(&mut segments, &current);
    segments
}

fn push_segment(segments: &mut Vec<String>, lines: &[&str]) {
    let joined = lines.join("\n");
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
}

/// Merge or split segments until there are exactly `expected`.
///
/// While there are too many, the shortest segment is merged into the one
/// before it (or after it, if it is first). While there are too few, the
/// longest segment with at least two sentences is split at the sentence
/// boundary nearest its middle. Returns `None` when no split is possible
/// or `expected` is zero.
pub fn reconcile(mut segments: Vec<String>, expected: usize) -> Option<Vec<String>> {
    if expected == 0 {
        return None;
    }

    while segments.len() > expected {
        let shortest = segments
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| s.chars().count())
            .map(|(index, _)| index)?;
        let (target, removed) = if shortest == 0 { (0, 1) } else { (shortest - 1, shortest) };
        let merged = segments.remove(removed);
        let kept = &mut segments[target];
        kept.push('\n');
        kept.push_str(&merged);
    }

    while segments.len() < expected {
        let (index, boundary) = segments
            .iter()
            .enumerate()
            .filter_map(|(index, s)| middle_boundary(s).map(|boundary| (index, s, boundary)))
            .max_by_key(|(index, s, _)| (s.chars().count(), std::cmp::Reverse(*index)))
            .map(|(index, _, boundary)| (index, boundary))?;

        let original = segments.remove(index);
        let (head, tail) = original.split_at(boundary);
        segments.insert(index, tail.trim().to_string());
        segments.insert(index, head.trim().to_string());
    }

    Some(segments)
}

/// Byte offsets just after each sentence-ending mark that is followed by
/// more text.
fn sentence_boundaries(text: &str) -> Vec<usize> {
    let mut boundaries = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        // Closing punctuation stays with its sentence
        while let Some(&(_, next)) = chars.peek() {
            if matches!(next, '.' | '!' | '?' | '"' | '\'' | ')' | '\u{201D}' | '\u{2019}') {
                chars.next();
            } else {
                break;
            }
        }
        if let Some(&(offset, next)) = chars.peek() {
            if next.is_whitespace() && !text[offset..].trim().is_empty() {
                boundaries.push(offset);
            }
        }
    }
    boundaries
}

fn middle_boundary(text: &str) -> Option<usize> {
    let middle = text.len() / 2;
    sentence_boundaries(text)
        .into_iter()
        .min_by_key(|&offset| offset.abs_diff(middle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_lines_take_precedence_over_blank_lines() {
        let text = "One.\n\nStill one.\n---\nTwo.\n  ---  \n\nThree.\n---\n";
        assert_eq!(
            split_segments(text),
            vec!["One.\n\nStill one.", "Two.", "Three."]
        );
    }

    #[test]
    fn blank_lines_separate_paragraphs_without_delimiters() {
        let text = "\nOne.\nMore one.\n\n\nTwo.\n   \nThree.";
        assert_eq!(split_segments(text), vec!["One.\nMore one.", "Two.", "Three."]);
    }

    #[test]
    fn strict_policy_reports_counts() {
        let err = segment("One.\n\nTwo.", 4, Segmentation::Strict).unwrap_err();
        assert!(format!("{}", err).contains("Expected 4 pages, story text has 2"));
    }

    #[test]
    fn reconcile_merges_shortest_into_previous() {
        let segments = vec![
            "A long first paragraph.".to_string(),
            "Hi.".to_string(),
            "Another long paragraph here.".to_string(),
        ];
        let pages = reconcile(segments, 2).unwrap();
        assert_eq!(
            pages,
            vec!["A long first paragraph.\nHi.", "Another long paragraph here."]
        );
    }

    #[test]
    fn reconcile_merges_first_into_next() {
        let segments = vec![
            "Hi.".to_string(),
            "A long second paragraph.".to_string(),
        ];
        let pages = reconcile(segments, 1).unwrap();
        assert_eq!(pages, vec!["Hi.\nA long second paragraph."]);
    }

    #[test]
    fn reconcile_splits_longest_at_middle_sentence() {
        let segments = vec![
            "Sam ran. Tika swam. They met. They played.".to_string(),
            "The end.".to_string(),
        ];
        let pages = reconcile(segments, 3).unwrap();
        assert_eq!(
            pages,
            vec!["Sam ran. Tika swam.", "They met. They played.", "The end."]
        );
    }

    #[test]
    fn reconcile_fails_without_sentence_boundaries() {
        let segments = vec!["One sentence only.".to_string()];
        assert!(reconcile(segments, 2).is_none());
    }

    #[test]
    fn closing_quotes_stay_with_their_sentence() {
        assert_eq!(sentence_boundaries("\"Hello!\" said Sam. Bye."), vec![8, 18]);
    }

    #[test]
    fn reconcile_policy_reaches_requested_count() {
        let text = "Sam woke. Sam ate. Sam ran. Sam slept.";
        let pages = segment(text, 4, Segmentation::Reconcile).unwrap();
        assert_eq!(pages, vec!["Sam woke.", "Sam ate.", "Sam ran.", "Sam slept."]);
    }
}
