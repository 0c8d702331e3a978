//! HTTP page fetcher.

use super::ContentFetcher;
use super::config::CrawlSettings;
use super::extract::visible_text;
use crate::models::FetchResult;
use crate::{Error, Result};
use std::time::Duration;

/// Fetches pages over HTTP(S) and extracts their visible text.
///
/// Uses a blocking `reqwest` client; build it outside any async runtime and
/// let [`super::CrawlService`] move calls onto the blocking pool.
#[derive(Debug, Clone)]
pub struct HttpContentFetcher {
    client: reqwest::blocking::Client,
}

impl HttpContentFetcher {
    /// Builds a fetcher with the configured timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the HTTP client cannot be built.
    pub fn new(settings: &CrawlSettings) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(settings.user_agent.clone());
        if settings.fetch_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(settings.fetch_timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| Error::operation("build_http_client", e))?;
        Ok(Self { client })
    }
}

impl ContentFetcher for HttpContentFetcher {
    fn fetch(&self, url: &str) -> FetchResult {
        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(e) => {
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else if e.is_builder() {
                    "invalid url"
                } else {
                    "request"
                };
                tracing::warn!(url = %url, error = %e, error_kind, "Page fetch failed");
                return FetchResult::error(url, format!("{error_kind} error: {e}"));
            },
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Page returned error status");
            return FetchResult::error(url, format!("HTTP status {status}"));
        }

        match response.text() {
            Ok(body) => FetchResult::content(url, visible_text(&body)),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to read page body");
                FetchResult::error(url, format!("body error: {e}"))
            },
        }
    }
}
