use crate::normalizer::normalize;
use crate::resolver::{LookupOutcome, MetadataResolver};
use crate::summary::{BatchSummary, SkipReason};
use crate::timestamp::parse_watch_time;
use tracing::{debug, info, warn};
use watchlog_models::{HistoryRecord, ImportEntry};
use watchlog_sources::MetadataProvider;

const PROGRESS_INTERVAL: usize = 50;

/// Entries in input order plus the run's counts.
#[derive(Debug)]
pub struct BatchResult {
    pub entries: Vec<ImportEntry>,
    pub summary: BatchSummary,
}

/// Turns history records into import entries, one record at a time.
///
/// A record that cannot be resolved is skipped with a reason; nothing a
/// single record does aborts the batch.
pub struct ImportGenerator<P: MetadataProvider> {
    resolver: MetadataResolver<P>,
}

impl<P: MetadataProvider> ImportGenerator<P> {
    pub fn new(resolver: MetadataResolver<P>) -> Self {
        Self { resolver }
    }

    pub fn generate(&mut self, records: &[HistoryRecord]) -> BatchResult {
        self.generate_with_progress(records, |_| {})
    }

    /// `on_record` is called after each record with the number processed.
    pub fn generate_with_progress<F>(&mut self, records: &[HistoryRecord], mut on_record: F) -> BatchResult
    where
        F: FnMut(usize),
    {
        let mut summary = BatchSummary::new(records.len(), PROGRESS_INTERVAL);
        let mut entries = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            match self.process(record) {
                Ok(entry) => {
                    summary.record_resolved();
                    entries.push(entry);
                }
                Err(reason) => summary.record_skipped(reason),
            }
            summary.log_progress(idx + 1);
            on_record(idx + 1);
        }

        summary.log_summary("Import generation");
        BatchResult { entries, summary }
    }

    fn process(&mut self, record: &HistoryRecord) -> Result<ImportEntry, SkipReason> {
        if record.filename.trim().is_empty() {
            warn!("Skipping record {}: empty filename", record.id);
            return Err(SkipReason::EmptyFilename);
        }

        let normalized = normalize(&record.filename);
        if !normalized.is_searchable() {
            warn!(
                "Skipping '{}': cleaned title '{}' is too short",
                record.filename, normalized.title
            );
            return Err(SkipReason::TitleTooShort);
        }

        let Some(watched_at) = record.generated.as_ref().and_then(parse_watch_time) else {
            warn!("Skipping '{}': missing or unparseable timestamp", record.filename);
            return Err(SkipReason::MissingTimestamp);
        };

        debug!(
            "'{}' -> '{}' (year: {:?}, episodic: {})",
            record.filename, normalized.title, normalized.year, normalized.is_episodic
        );

        match self
            .resolver
            .resolve(&normalized.title, normalized.year, normalized.is_episodic)
        {
            LookupOutcome::Resolved(media) => {
                info!("'{}' -> {} ({})", normalized.title, media.imdb_id, media.title);
                Ok(ImportEntry::new(media.imdb_id, watched_at))
            }
            LookupOutcome::NotFound => {
                warn!("No match for '{}' from '{}'", normalized.title, record.filename);
                Err(SkipReason::NotFound)
            }
            LookupOutcome::Failed(_) => Err(SkipReason::LookupFailed),
        }
    }

    pub fn resolver(&self) -> &MetadataResolver<P> {
        &self.resolver
    }

    pub fn into_resolver(self) -> MetadataResolver<P> {
        self.resolver
    }
}
