//! Duplicate match types.

use super::EntryId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How two paragraphs relate.
///
/// The two kinds are mutually exclusive for any pair of paragraphs: a pair
/// reported as `Exact` is never also reported as `Similar`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Identical normalized content, or identical shingle sets.
    Exact,
    /// Shingle similarity at or above the threshold but below 1.0.
    Similar,
}

impl MatchKind {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Similar => "similar",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A later paragraph of a text that duplicates or resembles an earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalMatch {
    /// Index of the later paragraph.
    pub index: usize,
    /// Text of the later paragraph.
    pub paragraph: String,
    /// Index of the earlier paragraph it matches.
    pub original_index: usize,
    /// Exact or similar.
    pub kind: MatchKind,
}

/// A submitted paragraph that duplicates or resembles a stored one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalMatch {
    /// Id of the stored text the matching paragraph belongs to.
    pub source_id: EntryId,
    /// Index of the matching paragraph within the stored text.
    pub source_paragraph_index: usize,
    /// Text of the stored paragraph.
    pub paragraph: String,
    /// Index of the paragraph in the submitted text.
    pub new_text_index: usize,
    /// Exact or similar.
    pub kind: MatchKind,
}

impl ExternalMatch {
    /// Canonical ordering key within one source entry.
    #[must_use]
    pub const fn sort_key(&self) -> (usize, usize, MatchKind) {
        (self.source_paragraph_index, self.new_text_index, self.kind)
    }
}

/// Either kind of duplicate relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum DuplicateMatch {
    /// Within the same text.
    Internal(InternalMatch),
    /// Against a different, stored text.
    External(ExternalMatch),
}

impl DuplicateMatch {
    /// Returns the match kind.
    #[must_use]
    pub const fn kind(&self) -> MatchKind {
        match self {
            Self::Internal(m) => m.kind,
            Self::External(m) => m.kind,
        }
    }

    /// Returns the matched paragraph text.
    #[must_use]
    pub fn paragraph(&self) -> &str {
        match self {
            Self::Internal(m) => &m.paragraph,
            Self::External(m) => &m.paragraph,
        }
    }
}

impl From<InternalMatch> for DuplicateMatch {
    fn from(m: InternalMatch) -> Self {
        Self::Internal(m)
    }
}

impl From<ExternalMatch> for DuplicateMatch {
    fn from(m: ExternalMatch) -> Self {
        Self::External(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        assert_eq!(MatchKind::Exact.to_string(), "exact");
        assert_eq!(MatchKind::Similar.to_string(), "similar");
    }

    #[test]
    fn test_kind_orders_exact_first() {
        assert!(MatchKind::Exact < MatchKind::Similar);
    }

    #[test]
    fn test_duplicate_match_serializes_with_scope_tag() {
        let m = DuplicateMatch::from(InternalMatch {
            index: 1,
            paragraph: "A.".to_string(),
            original_index: 0,
            kind: MatchKind::Exact,
        });
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["scope"], "internal");
        assert_eq!(json["kind"], "exact");
        assert_eq!(json["original_index"], 0);
        assert_eq!(m.paragraph(), "A.");
    }
}
