pub mod config;
pub mod credentials;
pub mod error;
pub mod paths;

pub use config::{CacheConfig, CacheMode, Config, HistoryConfig, MetadataConfig, OutputConfig};
pub use credentials::{CredentialStore, Credentials, REALDEBRID_TOKEN_ENV, TMDB_API_KEY_ENV};
pub use error::ConfigError;
pub use paths::{base_path_override, PathManager};
