//! Network-free metadata provider for resolver and generator tests.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use watchlog_models::{MediaType, SearchCandidate};
use watchlog_sources::{MetadataProvider, SearchQuery, SourceError};

struct StubEntry {
    candidate: SearchCandidate,
    imdb_id: Option<String>,
}

/// Movies match on title plus year when the query carries one; shows match
/// on title alone, like the real search endpoints.
#[derive(Default)]
pub struct StubProvider {
    entries: Vec<StubEntry>,
    failing: HashSet<String>,
    searches: RefCell<Vec<(String, Option<u32>)>>,
    id_calls: Cell<usize>,
}

impl StubProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movie(mut self, title: &str, year: Option<u32>, tmdb_id: u64, imdb_id: Option<&str>) -> Self {
        self.push(title, year, tmdb_id, imdb_id, MediaType::Movie);
        self
    }

    pub fn with_show(mut self, title: &str, tmdb_id: u64, imdb_id: Option<&str>) -> Self {
        self.push(title, None, tmdb_id, imdb_id, MediaType::Show);
        self
    }

    pub fn failing_on(mut self, title: &str) -> Self {
        self.failing.insert(title.to_string());
        self
    }

    fn push(&mut self, title: &str, year: Option<u32>, tmdb_id: u64, imdb_id: Option<&str>, media_type: MediaType) {
        self.entries.push(StubEntry {
            candidate: SearchCandidate {
                tmdb_id,
                title: title.to_string(),
                year,
                media_type,
            },
            imdb_id: imdb_id.map(str::to_string),
        });
    }

    pub fn searches(&self) -> Vec<(String, Option<u32>)> {
        self.searches.borrow().clone()
    }

    pub fn search_calls(&self) -> usize {
        self.searches.borrow().len()
    }

    pub fn id_calls(&self) -> usize {
        self.id_calls.get()
    }
}

impl MetadataProvider for StubProvider {
    fn provider_name(&self) -> &str {
        "stub"
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<SearchCandidate>, SourceError> {
        self.searches.borrow_mut().push((query.title.clone(), query.year));
        if self.failing.contains(&query.title) {
            return Err(SourceError::Status {
                endpoint: "/search/movie".to_string(),
                status: 500,
                body: "upstream unavailable".to_string(),
            });
        }
        Ok(self
            .entries
            .iter()
            .map(|e| &e.candidate)
            .filter(|c| c.media_type == query.media_type && c.title == query.title)
            .filter(|c| match (query.media_type, query.year) {
                (MediaType::Movie, Some(year)) => c.year == Some(year),
                _ => true,
            })
            .cloned()
            .collect())
    }

    fn imdb_id(&self, media_type: MediaType, tmdb_id: u64) -> Result<Option<String>, SourceError> {
        self.id_calls.set(self.id_calls.get() + 1);
        Ok(self
            .entries
            .iter()
            .find(|e| e.candidate.media_type == media_type && e.candidate.tmdb_id == tmdb_id)
            .and_then(|e| e.imdb_id.clone()))
    }
}
