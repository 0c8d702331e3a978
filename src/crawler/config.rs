//! Crawl configuration.

use crate::services::deduplication::config::env_parse;
use serde::{Deserialize, Serialize};

/// Default number of pages fetched at the same time.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// Default per-page timeout in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 50;

/// Configuration for crawling.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `PARADUP_MAX_CONCURRENT_FETCHES` | usize | `4` | Pages fetched at once (min 1) |
/// | `PARADUP_FETCH_TIMEOUT_SECS` | u64 | `50` | Per-page timeout |
/// | `PARADUP_USER_AGENT` | string | `paradup/<version>` | User agent header |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlSettings {
    /// Maximum number of fetches in flight.
    pub max_concurrent_fetches: usize,
    /// Per-page timeout in seconds (0 = no timeout).
    pub fetch_timeout_secs: u64,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: concat!("paradup/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl CrawlSettings {
    /// Creates settings from environment variables over the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_parse::<usize>("PARADUP_MAX_CONCURRENT_FETCHES") {
            self.max_concurrent_fetches = v.max(1);
        }
        if let Some(v) = env_parse("PARADUP_FETCH_TIMEOUT_SECS") {
            self.fetch_timeout_secs = v;
        }
        if let Ok(v) = std::env::var("PARADUP_USER_AGENT") {
            if !v.trim().is_empty() {
                self.user_agent = v;
            }
        }
        self
    }

    /// Sets the maximum concurrent fetches.
    #[must_use]
    pub const fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max;
        self
    }

    /// Sets the per-page timeout in seconds.
    #[must_use]
    pub const fn with_fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
