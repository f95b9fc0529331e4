use serde::Serialize;
use std::collections::BTreeMap;
use watchlog_models::HistoryRecord;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Aggregate view of a fetched history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    pub total_downloads: usize,
    pub total_bytes: u64,
    pub status_counts: BTreeMap<String, usize>,
}

impl HistoryStats {
    pub fn from_records(records: &[HistoryRecord]) -> Self {
        let mut status_counts = BTreeMap::new();
        for record in records {
            *status_counts.entry(record.status_or_unknown().to_string()).or_insert(0) += 1;
        }
        Self {
            total_downloads: records.len(),
            total_bytes: records.iter().map(HistoryRecord::size_bytes).sum(),
            status_counts,
        }
    }

    pub fn total_size_gb(&self) -> f64 {
        self.total_bytes as f64 / BYTES_PER_GB
    }
}
