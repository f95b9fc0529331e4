use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;
use watchlog_models::HistoryRecord;

pub const SNAPSHOT_PREFIX: &str = "real_debrid_downloads";

/// Files written for one fetch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

/// Writes the full record set as `<prefix>_<stamp>.json` and `.csv`.
pub fn save_snapshot(dir: &Path, records: &[HistoryRecord], stamp: &str) -> Result<SnapshotPaths> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let paths = SnapshotPaths {
        json: dir.join(format!("{}_{}.json", SNAPSHOT_PREFIX, stamp)),
        csv: dir.join(format!("{}_{}.csv", SNAPSHOT_PREFIX, stamp)),
    };
    write_json(&paths.json, records)?;
    write_csv(&paths.csv, records)?;
    info!(
        "Saved {} records to {} and {}",
        records.len(),
        paths.json.display(),
        paths.csv.display()
    );
    Ok(paths)
}

pub fn write_json(path: &Path, records: &[HistoryRecord]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), records)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// One row per record; the header is the sorted union of every record's keys.
pub fn write_csv(path: &Path, records: &[HistoryRecord]) -> Result<()> {
    let rows: Vec<serde_json::Map<String, Value>> = records
        .iter()
        .map(|record| match serde_json::to_value(record) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Ok(serde_json::Map::new()),
            Err(e) => Err(e),
        })
        .collect::<Result<_, _>>()?;

    let header: BTreeSet<&str> = rows.iter().flat_map(|row| row.keys().map(String::as_str)).collect();

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    if rows.is_empty() {
        writer.flush()?;
        return Ok(());
    }
    writer.write_record(&header)?;
    for row in &rows {
        writer.write_record(header.iter().map(|key| cell(row.get(*key))))?;
    }
    writer.flush()?;
    Ok(())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Reads a JSON snapshot written by [`save_snapshot`].
pub fn load_snapshot(path: &Path) -> Result<Vec<HistoryRecord>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let records = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("{} is not a history snapshot", path.display()))?;
    Ok(records)
}
