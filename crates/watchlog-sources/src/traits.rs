use crate::error::SourceError;
use watchlog_models::{HistoryRecord, MediaType, SearchCandidate};

/// A hosting provider that can list past downloads.
pub trait HistoryProvider {
    fn provider_name(&self) -> &str;

    /// Fetches up to `limit` records in one request, newest first.
    fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryRecord>, SourceError>;
}

/// What the resolver asks the metadata provider for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub title: String,
    /// Only honored for movie searches.
    pub year: Option<u32>,
    pub media_type: MediaType,
}

impl SearchQuery {
    pub fn new(title: impl Into<String>, year: Option<u32>, media_type: MediaType) -> Self {
        Self {
            title: title.into(),
            year,
            media_type,
        }
    }

    pub fn without_year(&self) -> Self {
        Self {
            year: None,
            ..self.clone()
        }
    }
}

/// Title search plus id translation. Stubbed in tests.
pub trait MetadataProvider {
    fn provider_name(&self) -> &str;

    /// Candidates in the provider's own relevance order.
    fn search(&self, query: &SearchQuery) -> Result<Vec<SearchCandidate>, SourceError>;

    /// IMDb id for a provider-native id, `None` when the provider has none.
    fn imdb_id(&self, media_type: MediaType, tmdb_id: u64) -> Result<Option<String>, SourceError>;
}
