//! Fetched-page batches and their per-URL results.

use super::DuplicateReport;
use serde::{Deserialize, Serialize};

/// Error reported for a page that was fetched but yielded no text.
pub const NO_CONTENT_MARKER: &str = "No content crawled";

/// What fetching a single URL produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOutcome {
    /// Visible page text.
    Content(String),
    /// Description of why the fetch failed.
    Error(String),
}

/// The fetch result for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    /// The requested URL.
    pub url: String,
    /// Fetched text or error.
    #[serde(flatten)]
    pub outcome: FetchOutcome,
}

impl FetchResult {
    /// A successful fetch.
    #[must_use]
    pub fn content(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            outcome: FetchOutcome::Content(content.into()),
        }
    }

    /// A failed fetch.
    #[must_use]
    pub fn error(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            outcome: FetchOutcome::Error(error.into()),
        }
    }

    /// Returns the fetched content, if any.
    #[must_use]
    pub fn content_str(&self) -> Option<&str> {
        match &self.outcome {
            FetchOutcome::Content(c) => Some(c),
            FetchOutcome::Error(_) => None,
        }
    }
}

/// Per-URL result of comparing a fetched batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcome {
    /// Detection ran on the fetched content.
    Report(DuplicateReport),
    /// No detection was attempted.
    Error(String),
}

/// The comparison result for one URL of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    /// The requested URL.
    pub url: String,
    /// Report or error.
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

impl BatchItem {
    /// Returns the report, if detection ran.
    #[must_use]
    pub const fn report(&self) -> Option<&DuplicateReport> {
        match &self.outcome {
            BatchOutcome::Report(r) => Some(r),
            BatchOutcome::Error(_) => None,
        }
    }

    /// Returns the error, if detection was skipped.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            BatchOutcome::Report(_) => None,
            BatchOutcome::Error(e) => Some(e),
        }
    }
}
