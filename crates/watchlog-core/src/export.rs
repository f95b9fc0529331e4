use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;
use watchlog_models::ImportEntry;

pub const IMPORT_PREFIX: &str = "trakt_import";

/// Writes the bulk import file `trakt_import_<stamp>.json` into `dir`.
pub fn write_import_file(dir: &Path, entries: &[ImportEntry], stamp: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(format!("{}_{}.json", IMPORT_PREFIX, stamp));
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), entries)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} import entries to {}", entries.len(), path.display());
    Ok(path)
}

/// Local time stamp used in output file names, e.g. `20240102_030405`.
pub fn run_stamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}
