use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use watchlog_models::{MediaType, ResolvedMedia};

/// Exact lookup key. Movies and shows live in separate namespaces, so the
/// same title can resolve differently per kind.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKey {
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<u32>,
}

impl CacheKey {
    pub fn new(media_type: MediaType, title: impl Into<String>, year: Option<u32>) -> Self {
        Self {
            media_type,
            title: title.into(),
            year,
        }
    }
}

/// A completed lookup. Misses are remembered so they are not re-queried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CachedLookup {
    Found(ResolvedMedia),
    NotFound,
}

/// In-process map of completed lookups, optionally persisted between runs
/// by [`crate::cache_storage::LookupCacheStorage`].
#[derive(Debug, Default)]
pub struct LookupCache {
    entries: HashMap<CacheKey, CachedLookup>,
    dirty: bool,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (CacheKey, CachedLookup)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            dirty: false,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<&CachedLookup> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: CacheKey, value: CachedLookup) {
        self.entries.insert(key, value);
        self.dirty = true;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn negative_count(&self) -> usize {
        self.entries
            .values()
            .filter(|v| matches!(v, CachedLookup::NotFound))
            .count()
    }

    /// True when entries were added since load or the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Entries in a stable order for serialization.
    pub fn sorted_entries(&self) -> Vec<(CacheKey, CachedLookup)> {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort_by(|a, b| {
            (a.0.media_type, &a.0.title, a.0.year).cmp(&(b.0.media_type, &b.0.title, b.0.year))
        });
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> ResolvedMedia {
        ResolvedMedia {
            imdb_id: "tt0133093".into(),
            tmdb_id: 603,
            title: "The Matrix".into(),
            year: Some(1999),
            media_type: MediaType::Movie,
        }
    }

    #[test]
    fn test_keys_are_exact() {
        let mut cache = LookupCache::new();
        cache.insert(
            CacheKey::new(MediaType::Movie, "The Matrix", Some(1999)),
            CachedLookup::Found(matrix()),
        );

        assert!(cache.get(&CacheKey::new(MediaType::Movie, "The Matrix", Some(1999))).is_some());
        assert!(cache.get(&CacheKey::new(MediaType::Movie, "The Matrix", None)).is_none());
        assert!(cache.get(&CacheKey::new(MediaType::Movie, "the matrix", Some(1999))).is_none());
        assert!(cache.get(&CacheKey::new(MediaType::Show, "The Matrix", Some(1999))).is_none());
    }

    #[test]
    fn test_dirty_tracking_and_negatives() {
        let mut cache = LookupCache::from_entries(vec![(
            CacheKey::new(MediaType::Show, "Nothing Here", None),
            CachedLookup::NotFound,
        )]);
        assert!(!cache.is_dirty());
        assert_eq!(cache.negative_count(), 1);

        cache.insert(CacheKey::new(MediaType::Movie, "The Matrix", Some(1999)), CachedLookup::Found(matrix()));
        assert!(cache.is_dirty());
        assert_eq!(cache.len(), 2);

        cache.mark_clean();
        assert!(!cache.is_dirty());
    }

    #[test]
    fn test_sorted_entries_stable() {
        let mut cache = LookupCache::new();
        cache.insert(CacheKey::new(MediaType::Show, "B", None), CachedLookup::NotFound);
        cache.insert(CacheKey::new(MediaType::Movie, "Z", None), CachedLookup::NotFound);
        cache.insert(CacheKey::new(MediaType::Movie, "A", Some(2000)), CachedLookup::NotFound);

        let titles: Vec<_> = cache.sorted_entries().into_iter().map(|(k, _)| k.title).collect();
        assert_eq!(titles, vec!["A", "Z", "B"]);
    }
}
