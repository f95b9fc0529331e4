use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings from `config.toml`. Every section is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryConfig {
    #[serde(default = "default_history_base_url")]
    pub base_url: String,
    /// Upper bound sent as `limit` on the single history request.
    #[serde(default = "default_history_limit")]
    pub limit: usize,
    /// Rows shown in the download table after a fetch.
    #[serde(default = "default_display_limit")]
    pub display_limit: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataConfig {
    #[serde(default = "default_metadata_base_url")]
    pub base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub include_adult: bool,
    /// Pause between the end of one request and the start of the next.
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
    #[serde(default = "default_true")]
    pub retry_without_year: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// Lookups live for one run only.
    Memory,
    /// Lookups are loaded at start and written back at the end of a run.
    #[default]
    Disk,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CacheConfig {
    #[serde(default)]
    pub mode: CacheMode,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_history_base_url() -> String {
    "https://api.real-debrid.com/rest/1.0".to_string()
}

fn default_history_limit() -> usize {
    5000
}

fn default_display_limit() -> usize {
    50
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_metadata_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_min_request_interval_ms() -> u64 {
    100
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_history_base_url(),
            limit: default_history_limit(),
            display_limit: default_display_limit(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            base_url: default_metadata_base_url(),
            language: default_language(),
            include_adult: false,
            min_request_interval_ms: default_min_request_interval_ms(),
            retry_without_year: true,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the file when present, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("history.base_url cannot be empty".into()));
        }
        if self.metadata.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("metadata.base_url cannot be empty".into()));
        }
        if self.history.limit == 0 {
            return Err(ConfigError::Invalid("history.limit must be at least 1".into()));
        }
        if self.history.request_timeout_secs == 0 || self.metadata.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}
