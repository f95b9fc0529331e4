use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::debug;
use watchlog_config::{Config, CredentialStore, Credentials, PathManager};

/// Everything a command needs from disk, loaded and validated up front.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: Credentials,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        paths
            .ensure_directories()
            .map_err(|e| eyre!("Failed to create watchlog directories: {:#}", e))?;

        let config = Config::load_or_default(&paths.config_file())?;
        config.validate()?;

        let mut store = CredentialStore::new(paths.credentials_file());
        store.load()?;
        let credentials = Credentials::resolve(&store);

        debug!(
            config_file = %paths.config_file().display(),
            credentials = ?credentials,
            "Loaded configuration"
        );

        Ok(Self {
            paths,
            config,
            credentials,
        })
    }

    /// `--output-dir` when given, else `[output].directory`.
    pub fn output_dir(&self, requested: Option<PathBuf>) -> PathBuf {
        requested.unwrap_or_else(|| self.config.output.directory.clone())
    }
}
