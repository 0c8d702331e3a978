//! k-word shingles and Jaccard similarity.

use super::hasher::ContentHasher;
use crate::models::ContentHash;
use std::collections::HashSet;

/// The set of hashed k-word windows of one paragraph.
///
/// Text is lower-cased and split on whitespace runs before windowing.
/// Repeated windows collapse. Paragraphs with fewer than k words have an
/// empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShingleSet(HashSet<ContentHash>);

impl ShingleSet {
    /// Builds the shingle set of `text` using windows of `k` words.
    ///
    /// # Example
    ///
    /// ```rust
    /// use paradup::services::deduplication::ShingleSet;
    ///
    /// let set = ShingleSet::from_text("one two three four five six", 5);
    /// assert_eq!(set.len(), 2);
    /// assert!(ShingleSet::from_text("too short", 5).is_empty());
    /// ```
    #[must_use]
    pub fn from_text(text: &str, k: usize) -> Self {
        if k == 0 {
            return Self::default();
        }
        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        Self(words.windows(k).map(ContentHasher::hash_words).collect())
    }

    /// Number of distinct shingles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the paragraph was too short to shingle.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of shingles shared with `other`.
    #[must_use]
    pub fn intersection_len(&self, other: &Self) -> usize {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small.0.iter().filter(|h| large.0.contains(h)).count()
    }
}

/// Jaccard coefficient `|A ∩ B| / |A ∪ B|`.
///
/// Defined as 0.0 when either set is empty: a paragraph too short to shingle
/// cannot be compared.
///
/// ```rust
/// use paradup::services::deduplication::{jaccard, ShingleSet};
///
/// let a = ShingleSet::from_text("a b c d e f", 5);
/// assert!((jaccard(&a, &a) - 1.0).abs() < f64::EPSILON);
/// assert!(jaccard(&a, &ShingleSet::default()).abs() < f64::EPSILON);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)] // shingle counts are far below 2^52
pub fn jaccard(a: &ShingleSet, b: &ShingleSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection_len(b);
    let union = a.len() + b.len() - shared;
    shared as f64 / union as f64
}
