use super::prompts;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use watchlog_config::credentials::mask;
use watchlog_config::{Config, ConfigError, CredentialStore, Credentials, PathManager};
use watchlog_core::LookupCacheStorage;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output),
        ConfigCommands::Init { force } => init_config(force, output),
        ConfigCommands::Credentials {
            realdebrid_token,
            tmdb_key,
        } => configure_credentials(realdebrid_token, tmdb_key, output),
    }
}

fn section(title: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    if !config_file.exists() {
        output.info(format!(
            "No config file at {}, showing defaults. Run 'watchlog config init' to create one.",
            config_file.display()
        ));
    }
    let config = Config::load_or_default(&config_file)?;

    let mut store = CredentialStore::new(path_manager.credentials_file());
    store.load()?;
    let credentials = Credentials::resolve(&store);
    let realdebrid = display_secret(credentials.realdebrid_token(), full);
    let tmdb = display_secret(credentials.tmdb_api_key(), full);

    if !output.is_human() {
        output.json(&json!({
            "type": "config",
            "config_file": config_file.display().to_string(),
            "credentials_file": path_manager.credentials_file().display().to_string(),
            "cache_file": path_manager.lookup_cache_file().display().to_string(),
            "config": config,
            "credentials": {
                "realdebrid_api_token": realdebrid,
                "tmdb_api_key": tmdb,
            },
        }));
        return Ok(());
    }

    output.block(format!("{}", "Configuration".bright_cyan().bold()));

    let mut paths = section("Paths");
    paths.add_row(vec![Cell::new("Config file"), Cell::new(config_file.display())]);
    paths.add_row(vec![
        Cell::new("Credentials file"),
        Cell::new(path_manager.credentials_file().display()),
    ]);
    let cache = LookupCacheStorage::new(path_manager.lookup_cache_file());
    let cache_size = match cache.size() {
        Ok(0) => "empty".to_string(),
        Ok(bytes) => format!("{:.1} KB", bytes as f64 / 1024.0),
        Err(_) => "unreadable".to_string(),
    };
    paths.add_row(vec![
        Cell::new("Lookup cache"),
        Cell::new(format!("{} ({})", cache.path().display(), cache_size)),
    ]);
    paths.add_row(vec![Cell::new("Log directory"), Cell::new(path_manager.log_dir().display())]);
    paths.add_row(vec![
        Cell::new("Output directory"),
        Cell::new(config.output.directory.display()),
    ]);
    output.block(paths);

    let mut history = section("Real-Debrid");
    history.add_row(vec![Cell::new("Base URL"), Cell::new(&config.history.base_url)]);
    history.add_row(vec![Cell::new("History limit"), Cell::new(config.history.limit)]);
    history.add_row(vec![Cell::new("Display limit"), Cell::new(config.history.display_limit)]);
    history.add_row(vec![
        Cell::new("Timeout"),
        Cell::new(format!("{}s", config.history.request_timeout_secs)),
    ]);
    history.add_row(vec![Cell::new("API token"), Cell::new(&realdebrid)]);
    output.block(history);

    let mut metadata = section("TMDB");
    metadata.add_row(vec![Cell::new("Base URL"), Cell::new(&config.metadata.base_url)]);
    metadata.add_row(vec![Cell::new("Language"), Cell::new(&config.metadata.language)]);
    metadata.add_row(vec![
        Cell::new("Include adult"),
        Cell::new(if config.metadata.include_adult { "yes" } else { "no" }),
    ]);
    metadata.add_row(vec![
        Cell::new("Request interval"),
        Cell::new(format!("{} ms", config.metadata.min_request_interval_ms)),
    ]);
    metadata.add_row(vec![
        Cell::new("Retry without year"),
        Cell::new(if config.metadata.retry_without_year { "yes" } else { "no" }),
    ]);
    metadata.add_row(vec![
        Cell::new("Timeout"),
        Cell::new(format!("{}s", config.metadata.request_timeout_secs)),
    ]);
    metadata.add_row(vec![Cell::new("Cache mode"), Cell::new(format!("{:?}", config.cache.mode))]);
    metadata.add_row(vec![Cell::new("API key"), Cell::new(&tmdb)]);
    output.block(metadata);

    Ok(())
}

fn init_config(force: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    if config_file.exists() && !force {
        output.warn(format!(
            "Config file already exists at {}. Use --force to overwrite it.",
            config_file.display()
        ));
        return Ok(());
    }

    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create watchlog directories: {:#}", e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {:#}", config_file.display(), e))?;

    output.success(format!("Wrote default configuration to {}", config_file.display()));
    Ok(())
}

fn configure_credentials(
    realdebrid_token: Option<String>,
    tmdb_key: Option<String>,
    output: &Output,
) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create watchlog directories: {:#}", e))?;

    let mut store = CredentialStore::new(path_manager.credentials_file());
    store.load()?;

    let interactive = realdebrid_token.is_none() && tmdb_key.is_none();
    let realdebrid_token = match realdebrid_token {
        Some(token) => Some(token),
        None if interactive => non_empty(prompts::prompt_secret(
            "Real-Debrid API token (leave empty to keep current)",
        )?),
        None => None,
    };
    let tmdb_key = match tmdb_key {
        Some(key) => Some(key),
        None if interactive => non_empty(prompts::prompt_secret(
            "TMDB API key or read access token (leave empty to keep current)",
        )?),
        None => None,
    };

    if realdebrid_token.is_none() && tmdb_key.is_none() {
        output.info("No credentials changed");
        return Ok(());
    }

    if let Some(token) = realdebrid_token {
        store.set_realdebrid_token(token.trim().to_string());
    }
    if let Some(key) = tmdb_key {
        store.set_tmdb_api_key(key.trim().to_string());
    }

    store
        .save()
        .map_err(|e| eyre!("Failed to save credentials to {}: {:#}", store.path().display(), e))?;
    output.success(format!("Credentials saved to {}", store.path().display()));
    Ok(())
}

fn display_secret(value: Result<&str, ConfigError>, full: bool) -> String {
    match value {
        Ok(v) if full => v.to_string(),
        Ok(v) => mask(v),
        Err(ConfigError::PlaceholderCredential { .. }) => "placeholder".to_string(),
        Err(_) => "not set".to_string(),
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_display_secret_masks_unless_full() {
        assert_eq!(display_secret(Ok("abcdefgh1234"), false), "********1234");
        assert_eq!(display_secret(Ok("abcdefgh1234"), true), "abcdefgh1234");
    }

    #[test]
    fn test_display_secret_reports_missing_and_placeholder() {
        let missing = ConfigError::MissingCredential {
            key: "tmdb_api_key",
            env: "WATCHLOG_TMDB_API_KEY",
            path: PathBuf::from("credentials.toml"),
        };
        assert_eq!(display_secret(Err(missing), false), "not set");

        let placeholder = ConfigError::PlaceholderCredential {
            key: "tmdb_api_key",
            path: PathBuf::from("credentials.toml"),
        };
        assert_eq!(display_secret(Err(placeholder), true), "placeholder");
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty("  token \n".to_string()), Some("token".to_string()));
        assert_eq!(non_empty("   ".to_string()), None);
    }
}
