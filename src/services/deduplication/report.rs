//! Duplicate report assembly.

use crate::models::{DuplicateReport, ExternalMatch, InternalMatch};

/// Wraps detector outputs into the report callers consume.
///
/// Pure aggregation: the detectors have already classified and de-duplicated
/// every match.
///
/// ```rust
/// use paradup::services::deduplication::build_report;
///
/// let report = build_report(Vec::new(), Vec::new());
/// assert!(report.is_empty());
/// ```
#[must_use]
pub const fn build_report(internal: Vec<InternalMatch>, external: Vec<ExternalMatch>) -> DuplicateReport {
    DuplicateReport::new(internal, external)
}
