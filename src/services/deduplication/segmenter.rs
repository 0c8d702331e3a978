//! Paragraph segmentation.
//!
//! Text is split into comparison units in two passes:
//! 1. Split on runs of newline characters
//! 2. Lines longer than the configured length are split again at sentence
//!    boundaries (a period immediately followed by whitespace), with each
//!    sentence trimmed and empty sentences dropped
//!
//! Line length is counted in Unicode scalar values (`char`s), so a line of
//! emoji is measured by the symbols it contains rather than by its UTF-16 or
//! UTF-8 encoding. Short lines pass through untouched. Splitting on newline runs can only
//! leave an empty candidate at the very start or end of the text; those are
//! dropped. Whitespace-only lines are kept as units so later indices still
//! follow the text's line layout, but they never take part in matching.
//! Segmentation depends only on the content, so stored texts and new texts
//! are segmented identically.

use super::config::DEFAULT_LONG_PARAGRAPH_CHARS;
use crate::models::ParagraphUnit;
use crate::{Error, Result};

/// Splits text into ordered [`ParagraphUnit`]s.
///
/// # Example
///
/// ```rust
/// use paradup::services::deduplication::Segmenter;
///
/// let units = Segmenter::default().segment("First line\n\n\nSecond line");
/// assert_eq!(units.len(), 2);
/// assert_eq!(units[1].text, "Second line");
/// assert_eq!(units[1].index, 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    long_paragraph_chars: usize,
}

impl Segmenter {
    /// Creates a segmenter that re-splits lines longer than `long_paragraph_chars`.
    #[must_use]
    pub const fn new(long_paragraph_chars: usize) -> Self {
        Self {
            long_paragraph_chars,
        }
    }

    /// Segments text into indexed units.
    ///
    /// Empty input produces no units.
    #[must_use]
    pub fn segment(&self, text: &str) -> Vec<ParagraphUnit> {
        if text.is_empty() {
            return Vec::new();
        }

        text.split('\n')
            .filter(|line| !line.is_empty())
            .fold(Vec::new(), |mut acc, line| {
                if line.chars().count() > self.long_paragraph_chars {
                    acc.extend(split_sentences(line));
                } else {
                    acc.push(line);
                }
                acc
            })
            .into_iter()
            .enumerate()
            .map(|(index, text)| ParagraphUnit::new(text, index))
            .collect()
    }

    /// Decodes raw bytes into text, rejecting anything that is not UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the bytes are not valid UTF-8.
    pub fn decode(bytes: &[u8]) -> Result<&str> {
        std::str::from_utf8(bytes).map_err(|e| {
            Error::InvalidInput(format!(
                "content is not valid UTF-8 text (first bad byte at {})",
                e.valid_up_to()
            ))
        })
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(DEFAULT_LONG_PARAGRAPH_CHARS)
    }
}

/// Splits at `.` followed by whitespace; the period itself is consumed.
fn split_sentences(line: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut chars = line.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '.' {
            continue;
        }
        if chars.peek().is_some_and(|&(_, next)| next.is_whitespace()) {
            pieces.push(&line[start..i]);
            start = i + 1;
        }
    }
    pieces.push(&line[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
