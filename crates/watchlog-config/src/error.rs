use std::path::PathBuf;
use thiserror::Error;

/// Startup failures. All of these abort a run before any network call.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing credential `{key}`: set it in {path} or export {env}")]
    MissingCredential {
        key: &'static str,
        env: &'static str,
        path: PathBuf,
    },

    #[error("credential `{key}` in {path} still holds the template placeholder")]
    PlaceholderCredential { key: &'static str, path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
