//! Structured logging configuration.

use serde::Deserialize;
use std::path::PathBuf;

/// Default filter directive when neither `RUST_LOG` nor `PARADUP_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, falling back to [`LogFormat::Pretty`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Logging configuration.
///
/// # Environment Variables
///
/// | Variable | Description |
/// |----------|-------------|
/// | `PARADUP_LOG` | Filter directive, e.g. `paradup=debug` |
/// | `PARADUP_LOG_FORMAT` | `pretty` or `json` |
/// | `PARADUP_LOG_FILE` | Append log output to this file instead of stderr |
///
/// `RUST_LOG`, when set, takes precedence over the configured filter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// `tracing_subscriber::EnvFilter` directive.
    pub filter: String,
    /// Optional log file (append mode).
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: DEFAULT_LOG_FILTER.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("PARADUP_LOG") {
            if !v.trim().is_empty() {
                self.filter = v;
            }
        }
        if let Ok(v) = std::env::var("PARADUP_LOG_FORMAT") {
            self.format = LogFormat::parse(&v);
        }
        if let Ok(v) = std::env::var("PARADUP_LOG_FILE") {
            if !v.trim().is_empty() {
                self.file = Some(PathBuf::from(v));
            }
        }
        self
    }

    /// Raises the filter to debug output for this crate.
    #[must_use]
    pub fn verbose(mut self) -> Self {
        self.filter = format!("paradup=debug,{}", self.filter);
        self
    }

    /// Sets the output format.
    #[must_use]
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}
