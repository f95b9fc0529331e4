use super::context::AppContext;
use super::display;
use super::fetch::fetch_history;
use super::progress_ui::ImportProgress;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use watchlog_config::CacheMode;
use watchlog_core::{
    export, snapshot, FixedIntervalLimiter, ImportGenerator, LookupCache, LookupCacheStorage,
    MetadataResolver, ResolverOptions,
};
use watchlog_sources::{TmdbClient, TmdbSettings};

pub fn run_generate(
    input: Option<PathBuf>,
    limit: Option<usize>,
    output_dir: Option<PathBuf>,
    no_cache: bool,
    output: &Output,
) -> Result<()> {
    let ctx = AppContext::load()?;

    // Credentials are checked before the first request goes out.
    let tmdb_key = ctx.credentials.tmdb_api_key()?;
    let records = match input {
        Some(path) => snapshot::load_snapshot(&path)
            .map_err(|e| eyre!("Failed to read snapshot {}: {:#}", path.display(), e))?,
        None => fetch_history(&ctx, ctx.credentials.realdebrid_token()?, limit)?,
    };

    if records.is_empty() {
        output.warn("No history records to process");
        return Ok(());
    }
    output.info(format!("Processing {} history records", records.len()));

    let metadata = &ctx.config.metadata;
    let provider = TmdbClient::new(
        tmdb_key,
        TmdbSettings {
            base_url: metadata.base_url.clone(),
            language: metadata.language.clone(),
            include_adult: metadata.include_adult,
            timeout: Duration::from_secs(metadata.request_timeout_secs),
        },
    )?;

    let persist = ctx.config.cache.mode == CacheMode::Disk && !no_cache;
    let storage = LookupCacheStorage::new(ctx.paths.lookup_cache_file());
    let cache = if persist {
        storage
            .load()
            .map_err(|e| eyre!("Failed to load lookup cache {}: {:#}", storage.path().display(), e))?
    } else {
        LookupCache::new()
    };
    info!(entries = cache.len(), persist = persist, "Lookup cache ready");

    let resolver = MetadataResolver::new(
        provider,
        cache,
        Box::new(FixedIntervalLimiter::from_millis(metadata.min_request_interval_ms)),
    )
    .with_options(ResolverOptions {
        retry_without_year: metadata.retry_without_year,
    });

    let mut generator = ImportGenerator::new(resolver);
    let progress = ImportProgress::new(records.len());
    let result = generator.generate_with_progress(&records, |processed| progress.set_position(processed));
    progress.finish();

    let resolver = generator.into_resolver();
    let stats = resolver.stats();
    info!(
        cache_hits = stats.cache_hits,
        requests = stats.requests,
        failures = stats.failures,
        "Lookup statistics"
    );

    if persist {
        let cache = resolver.into_cache();
        if cache.is_dirty() {
            if let Err(e) = storage.save(&cache) {
                warn!(error = %e, path = %storage.path().display(), "Failed to save lookup cache");
                output.warn(format!("Failed to save lookup cache: {}", e));
            }
        }
    }

    output.block(display::summary_table(&result.summary));

    if result.entries.is_empty() {
        output.json(&json!({ "type": "generate", "summary": result.summary, "import_file": null }));
        output.warn("No titles could be resolved, no import file written");
        return Ok(());
    }

    let dir = ctx.output_dir(output_dir);
    let import_file = export::write_import_file(&dir, &result.entries, &export::run_stamp())
        .map_err(|e| eyre!("Failed to write import file in {}: {:#}", dir.display(), e))?;

    output.json(&json!({
        "type": "generate",
        "summary": result.summary,
        "import_file": import_file.display().to_string(),
    }));
    output.success(format!(
        "Wrote {} entries to {}",
        result.entries.len(),
        import_file.display()
    ));

    Ok(())
}
