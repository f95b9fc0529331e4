use super::context::AppContext;
use super::display;
use super::progress_ui;
use crate::output::Output;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use watchlog_core::{export, snapshot, HistoryStats};
use watchlog_models::HistoryRecord;
use watchlog_sources::{HistoryProvider, RealDebridClient};

pub fn run_fetch(limit: Option<usize>, output_dir: Option<PathBuf>, no_table: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let token = ctx.credentials.realdebrid_token()?;

    let records = fetch_history(&ctx, token, limit)?;
    if records.is_empty() {
        output.warn("No downloads found in history");
        return Ok(());
    }

    let stats = HistoryStats::from_records(&records);
    output.block(display::stats_table(&stats));
    if !no_table {
        let shown = ctx.config.history.display_limit.min(records.len());
        output.block(format!("\nShowing {} of {} downloads", shown, records.len()));
        output.block(display::downloads_table(&records, shown));
    }

    let dir = ctx.output_dir(output_dir);
    let paths = snapshot::save_snapshot(&dir, &records, &export::run_stamp())
        .map_err(|e| eyre!("Failed to save snapshot in {}: {:#}", dir.display(), e))?;

    output.json(&json!({
        "type": "fetch",
        "stats": stats,
        "json_file": paths.json.display().to_string(),
        "csv_file": paths.csv.display().to_string(),
    }));
    output.success(format!("Saved {} records to {}", records.len(), paths.json.display()));
    output.success(format!("Saved CSV snapshot to {}", paths.csv.display()));

    Ok(())
}

/// One request for the whole history, `limit` falling back to `[history].limit`.
pub(crate) fn fetch_history(ctx: &AppContext, token: &str, limit: Option<usize>) -> Result<Vec<HistoryRecord>> {
    let history = &ctx.config.history;
    let limit = limit.unwrap_or(history.limit);

    let client = RealDebridClient::new(
        history.base_url.as_str(),
        token,
        Duration::from_secs(history.request_timeout_secs),
    )?;

    let spinner = progress_ui::fetch_spinner("Fetching download history...");
    let result = client.fetch_history(limit);
    spinner.finish_and_clear();

    let records = result.wrap_err("Failed to fetch download history from Real-Debrid")?;
    info!(
        provider = client.provider_name(),
        count = records.len(),
        limit = limit,
        "Download history fetched"
    );
    Ok(records)
}
