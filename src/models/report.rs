//! The duplicate report handed back to callers.

use super::{DuplicateMatch, ExternalMatch, InternalMatch, MatchKind};
use serde::{Deserialize, Serialize};

/// Internal and external duplicates found for one text.
///
/// This is the single contract callers consume, whether the text came from a
/// submission or from a crawled page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Duplicates within the text itself.
    pub internal: Vec<InternalMatch>,
    /// Duplicates against stored texts.
    pub external: Vec<ExternalMatch>,
}

impl DuplicateReport {
    /// Creates a report from detector outputs.
    #[must_use]
    pub const fn new(internal: Vec<InternalMatch>, external: Vec<ExternalMatch>) -> Self {
        Self { internal, external }
    }

    /// Returns true if no duplicates of any kind were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.internal.is_empty() && self.external.is_empty()
    }

    /// Total number of matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.internal.len() + self.external.len()
    }

    /// Number of matches of the given kind, across both scopes.
    #[must_use]
    pub fn count_kind(&self, kind: MatchKind) -> usize {
        self.internal.iter().filter(|m| m.kind == kind).count()
            + self.external.iter().filter(|m| m.kind == kind).count()
    }

    /// Iterates every match as a tagged [`DuplicateMatch`], internal first.
    pub fn matches(&self) -> impl Iterator<Item = DuplicateMatch> + '_ {
        self.internal
            .iter()
            .cloned()
            .map(DuplicateMatch::Internal)
            .chain(self.external.iter().cloned().map(DuplicateMatch::External))
    }
}
