use super::prompts;
use super::progress_ui::is_interactive;
use crate::output::Output;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::fs;
use watchlog_config::PathManager;
use watchlog_core::LookupCacheStorage;

pub fn run_clear(all: bool, cache: bool, credentials: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();

    if !(all || cache || credentials) {
        output.warn("No clear option specified. Use --cache, --credentials, or --all");
        output.info("Example: watchlog clear --cache");
        return Ok(());
    }

    if all || cache {
        clear_cache(&path_manager, output)?;
    }
    if all || credentials {
        clear_credentials(&path_manager, output)?;
    }

    Ok(())
}

fn clear_cache(path_manager: &PathManager, output: &Output) -> Result<()> {
    let storage = LookupCacheStorage::new(path_manager.lookup_cache_file());
    let removed = storage
        .clear()
        .map_err(|e| eyre!("Failed to remove lookup cache at {}: {:#}", storage.path().display(), e))?;

    if removed {
        output.success(format!("Cleared lookup cache: {}", storage.path().display()));
    } else {
        output.info("No lookup cache found to clear");
    }
    Ok(())
}

fn clear_credentials(path_manager: &PathManager, output: &Output) -> Result<()> {
    let credentials_file = path_manager.credentials_file();
    if !credentials_file.exists() {
        output.info("No credentials file found to clear");
        return Ok(());
    }

    if is_interactive()
        && !prompts::prompt_yes_no(
            &format!("Delete stored credentials at {}?", credentials_file.display()),
            false,
        )?
    {
        output.info("Credentials kept");
        return Ok(());
    }

    fs::remove_file(&credentials_file)
        .wrap_err_with(|| format!("Failed to remove credentials file at {}", credentials_file.display()))?;
    output.success(format!("Cleared credentials: {}", credentials_file.display()));
    Ok(())
}
