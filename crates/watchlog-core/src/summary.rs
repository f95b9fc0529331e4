use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Why a history record produced no import entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    EmptyFilename,
    TitleTooShort,
    MissingTimestamp,
    NotFound,
    LookupFailed,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::EmptyFilename => "empty filename",
            SkipReason::TitleTooShort => "title too short",
            SkipReason::MissingTimestamp => "missing timestamp",
            SkipReason::NotFound => "not found",
            SkipReason::LookupFailed => "lookup failed",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts for one generator run, with periodic progress logging.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub resolved: usize,
    pub skipped: usize,
    pub skip_reasons: BTreeMap<SkipReason, usize>,
    #[serde(skip)]
    started: Instant,
    #[serde(skip)]
    progress_interval: usize,
    #[serde(skip)]
    last_progress_log: usize,
}

impl BatchSummary {
    /// `progress_interval`: log a progress line every N records.
    pub fn new(total: usize, progress_interval: usize) -> Self {
        Self {
            total,
            resolved: 0,
            skipped: 0,
            skip_reasons: BTreeMap::new(),
            started: Instant::now(),
            progress_interval: progress_interval.max(1),
            last_progress_log: 0,
        }
    }

    pub fn record_resolved(&mut self) {
        self.resolved += 1;
    }

    pub fn record_skipped(&mut self, reason: SkipReason) {
        self.skipped += 1;
        *self.skip_reasons.entry(reason).or_insert(0) += 1;
    }

    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skip_reasons.get(&reason).copied().unwrap_or(0)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// `current` is 1-based.
    pub fn log_progress(&mut self, current: usize) {
        if current - self.last_progress_log >= self.progress_interval || current == self.total {
            let elapsed = self.started.elapsed().as_secs_f64();
            if elapsed < 0.5 && current < self.total {
                return;
            }
            info!(
                "Progress: {}/{} | Resolved: {} | Skipped: {}",
                current, self.total, self.resolved, self.skipped
            );
            self.last_progress_log = current;
        }
    }

    pub fn log_summary(&self, operation_name: &str) {
        let elapsed = self.started.elapsed().as_secs_f64();
        if self.skipped > 0 {
            warn!(
                "{} completed: {} total in {:.1}s | Resolved: {} | Skipped: {}",
                operation_name, self.total, elapsed, self.resolved, self.skipped
            );
            let breakdown: Vec<String> = self
                .skip_reasons
                .iter()
                .map(|(reason, count)| format!("{}: {}", reason, count))
                .collect();
            info!("Skip breakdown: {}", breakdown.join(", "));
        } else {
            info!(
                "{} completed: {} total in {:.1}s | Resolved: {}",
                operation_name, self.total, elapsed, self.resolved
            );
        }
    }
}
