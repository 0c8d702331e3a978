//! Intermediate detection results.

use super::exact_match::HashIndex;
use super::shingle::ShingleSet;
use crate::models::{InternalMatch, ParagraphUnit};

/// Everything learned from one text before it is compared with the corpus.
///
/// Owned by a single detection call: each call builds its own hash index and
/// match list, so a shared detector never leaks state between requests.
#[derive(Debug, Clone, Default)]
pub struct WithinTextResult {
    /// The segmented paragraphs.
    pub paragraphs: Vec<ParagraphUnit>,
    /// First-occurrence index of every distinct paragraph hash.
    pub hashes: HashIndex,
    /// Exact and similar duplicates within the text.
    pub internal_matches: Vec<InternalMatch>,
    /// Shingle set per paragraph, aligned with `paragraphs`.
    pub(crate) shingles: Vec<ShingleSet>,
}

impl WithinTextResult {
    /// Returns the shingle sets, one per paragraph.
    #[must_use]
    pub fn shingles(&self) -> &[ShingleSet] {
        &self.shingles
    }
}
