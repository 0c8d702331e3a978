//! Configuration management.
//!
//! Settings are resolved in three layers, later layers winning:
//! 1. Built-in defaults
//! 2. A TOML file (`--config`, else the platform config directory)
//! 3. `PARADUP_*` environment variables

pub use crate::crawler::CrawlSettings;
pub use crate::observability::{LogFormat, LoggingConfig};
pub use crate::services::deduplication::DetectionSettings;

use crate::services::deduplication::config::env_parse;
use crate::storage::{DATABASE_FILE, default_data_dir};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration for paradup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParadupConfig {
    /// Duplicate detection tunables.
    pub detection: DetectionSettings,
    /// Page fetching.
    pub crawl: CrawlSettings,
    /// Corpus storage location.
    pub storage: StorageSettings,
    /// Log output.
    pub logging: LoggingConfig,
}

/// Where the corpus database lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Directory holding the database.
    pub data_dir: PathBuf,
    /// Database file name inside `data_dir`.
    pub database_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_file: DATABASE_FILE.to_string(),
        }
    }
}

impl StorageSettings {
    /// Returns the full database path.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }
}

/// Configuration file structure (for TOML parsing).
///
/// ```toml
/// [detection]
/// shingle_size = 5
/// similarity_threshold = 0.8
///
/// [crawl]
/// max_concurrent_fetches = 4
///
/// [storage]
/// data_dir = "/var/lib/paradup"
///
/// [logging]
/// format = "json"
/// ```
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Detection section.
    pub detection: Option<DetectionSettings>,
    /// Crawl section.
    pub crawl: Option<CrawlSettings>,
    /// Storage section.
    pub storage: Option<StorageSettings>,
    /// Logging section.
    pub logging: Option<LoggingConfig>,
}

impl ParadupConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::operation("read_config_file", e))?;
        Self::parse(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration file.
    pub fn parse(contents: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| Error::operation("parse_config_file", e))?;
        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks `paradup/config.toml` in the platform config directory, then
    /// `~/.config/paradup/config.toml`. Returns defaults if neither exists or
    /// parses.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("paradup").join("config.toml"),
            base_dirs.home_dir().join(".config").join("paradup").join("config.toml"),
        ];
        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                },
            }
        }

        Self::default()
    }

    /// Loads from `path` when given, otherwise from the default location,
    /// then applies environment overrides and validates.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file cannot be loaded or the resulting
    /// detection settings are invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_default(),
        }
        .with_env_overrides();
        config.detection.validate()?;
        Ok(config)
    }

    /// Applies `PARADUP_*` environment variable overrides to every section.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        self.detection = self.detection.with_env_overrides();
        self.crawl = self.crawl.with_env_overrides();
        self.logging = self.logging.with_env_overrides();
        if let Some(dir) = env_parse::<PathBuf>("PARADUP_DATA_DIR") {
            self.storage.data_dir = dir;
        }
        self
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage.data_dir = path.into();
        self
    }

    fn from_config_file(file: ConfigFile) -> Self {
        Self {
            detection: file.detection.unwrap_or_default(),
            crawl: file.crawl.unwrap_or_default(),
            storage: file.storage.unwrap_or_default(),
            logging: file.logging.unwrap_or_default(),
        }
    }
}
