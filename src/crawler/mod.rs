//! Web page fetching for crawl comparisons.
//!
//! A crawl fetches every requested URL through a [`ContentFetcher`], at most
//! `max_concurrent_fetches` at a time, and hands the ordered results to
//! [`DuplicateDetectionService::compare_fetched_batch`].
//!
//! Fetch failures are values: one unreachable URL never fails the batch.
//!
//! [`DuplicateDetectionService::compare_fetched_batch`]:
//!     crate::services::deduplication::DuplicateDetectionService::compare_fetched_batch

mod config;
mod extract;
mod http;
mod service;

pub use config::CrawlSettings;
pub use extract::visible_text;
pub use http::HttpContentFetcher;
pub use service::CrawlService;

use crate::models::FetchResult;

/// Trait for page fetchers.
///
/// Implementations block; [`CrawlService`] runs them on the blocking pool.
/// Every failure must be reported as [`crate::FetchOutcome::Error`] in the
/// returned result rather than by panicking.
pub trait ContentFetcher: Send + Sync {
    /// Fetches a page and returns its visible text or an error description.
    fn fetch(&self, url: &str) -> FetchResult;
}
