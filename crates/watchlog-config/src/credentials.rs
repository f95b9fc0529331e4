use crate::error::ConfigError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub const REALDEBRID_TOKEN_KEY: &str = "realdebrid_api_token";
pub const TMDB_API_KEY_KEY: &str = "tmdb_api_key";

pub const REALDEBRID_TOKEN_ENV: &str = "WATCHLOG_REALDEBRID_TOKEN";
pub const TMDB_API_KEY_ENV: &str = "WATCHLOG_TMDB_API_KEY";

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: BTreeMap<String, String>,
}

/// Key/value secrets file (`credentials.toml`), kept out of version control.
pub struct CredentialStore {
    path: PathBuf,
    credentials: BTreeMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file leaves the store empty.
    pub fn load(&mut self) -> Result<(), ConfigError> {
        if !self.path.exists() {
            return Ok(());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        let creds_data: CredentialsData =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;
        self.credentials = creds_data.data;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    pub fn get_realdebrid_token(&self) -> Option<&String> {
        self.get(REALDEBRID_TOKEN_KEY)
    }

    pub fn set_realdebrid_token(&mut self, token: String) {
        self.set(REALDEBRID_TOKEN_KEY.to_string(), token);
    }

    pub fn get_tmdb_api_key(&self) -> Option<&String> {
        self.get(TMDB_API_KEY_KEY)
    }

    pub fn set_tmdb_api_key(&mut self, key: String) {
        self.set(TMDB_API_KEY_KEY.to_string(), key);
    }
}

/// Template values shipped in the sample credentials file.
fn is_placeholder(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    lower.starts_with("your_") || lower.ends_with("_here")
}

/// Secrets resolved once at startup and handed to the API clients.
///
/// Environment variables win over the credentials file. Each accessor fails
/// with a descriptive [`ConfigError`] so commands can check what they need
/// before touching the network.
#[derive(Clone)]
pub struct Credentials {
    realdebrid_token: Option<String>,
    tmdb_api_key: Option<String>,
    source: PathBuf,
}

impl Credentials {
    pub fn resolve(store: &CredentialStore) -> Self {
        Self::resolve_with(store, |name| std::env::var(name).ok())
    }

    pub fn resolve_with<F>(store: &CredentialStore, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |env_name: &str, stored: Option<&String>| {
            env(env_name)
                .or_else(|| stored.cloned())
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            realdebrid_token: pick(REALDEBRID_TOKEN_ENV, store.get_realdebrid_token()),
            tmdb_api_key: pick(TMDB_API_KEY_ENV, store.get_tmdb_api_key()),
            source: store.path().to_path_buf(),
        }
    }

    pub fn realdebrid_token(&self) -> Result<&str, ConfigError> {
        self.require(REALDEBRID_TOKEN_KEY, REALDEBRID_TOKEN_ENV, self.realdebrid_token.as_deref())
    }

    pub fn tmdb_api_key(&self) -> Result<&str, ConfigError> {
        self.require(TMDB_API_KEY_KEY, TMDB_API_KEY_ENV, self.tmdb_api_key.as_deref())
    }

    fn require<'a>(
        &self,
        key: &'static str,
        env: &'static str,
        value: Option<&'a str>,
    ) -> Result<&'a str, ConfigError> {
        match value {
            None => Err(ConfigError::MissingCredential {
                key,
                env,
                path: self.source.clone(),
            }),
            Some(v) if is_placeholder(v) => Err(ConfigError::PlaceholderCredential {
                key,
                path: self.source.clone(),
            }),
            Some(v) => Ok(v),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("realdebrid_token", &self.realdebrid_token.as_deref().map(mask))
            .field("tmdb_api_key", &self.tmdb_api_key.as_deref().map(mask))
            .field("source", &self.source)
            .finish()
    }
}

/// Show only the last four characters of a secret.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
