use crate::cache::{CacheKey, CachedLookup, LookupCache};
use crate::ranking::{CandidateRanker, FirstResultRanker};
use crate::rate_limit::RateLimiter;
use tracing::{debug, warn};
use watchlog_models::{MediaType, ResolvedMedia};
use watchlog_sources::{MetadataProvider, SearchQuery, SourceError};

/// Result of resolving one normalized title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Resolved(ResolvedMedia),
    /// The provider answered but had no usable match.
    NotFound,
    /// The lookup could not complete (network, status or payload error).
    Failed(String),
}

impl From<CachedLookup> for LookupOutcome {
    fn from(cached: CachedLookup) -> Self {
        match cached {
            CachedLookup::Found(media) => LookupOutcome::Resolved(media),
            CachedLookup::NotFound => LookupOutcome::NotFound,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Repeat a movie search without its year when the first one is empty.
    pub retry_without_year: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            retry_without_year: true,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolverStats {
    pub cache_hits: usize,
    pub requests: usize,
    pub failures: usize,
}

/// Maps normalized titles to IMDb ids through a metadata provider.
///
/// Completed lookups, including misses, go into the [`LookupCache`] and are
/// answered from it afterwards without touching the network or the rate
/// limiter. Failed lookups are not cached.
pub struct MetadataResolver<P: MetadataProvider> {
    provider: P,
    cache: LookupCache,
    limiter: Box<dyn RateLimiter>,
    ranker: Box<dyn CandidateRanker>,
    options: ResolverOptions,
    stats: ResolverStats,
}

impl<P: MetadataProvider> MetadataResolver<P> {
    pub fn new(provider: P, cache: LookupCache, limiter: Box<dyn RateLimiter>) -> Self {
        Self {
            provider,
            cache,
            limiter,
            ranker: Box::new(FirstResultRanker),
            options: ResolverOptions::default(),
            stats: ResolverStats::default(),
        }
    }

    pub fn with_ranker(mut self, ranker: Box<dyn CandidateRanker>) -> Self {
        self.ranker = ranker;
        self
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn resolve(&mut self, title: &str, year: Option<u32>, is_episodic: bool) -> LookupOutcome {
        let key = CacheKey::new(MediaType::from_episodic(is_episodic), title, year);

        if let Some(cached) = self.cache.get(&key) {
            self.stats.cache_hits += 1;
            debug!("Cache hit for {} '{}' ({:?})", key.media_type, key.title, key.year);
            return cached.clone().into();
        }

        match self.lookup(&key) {
            Ok(Some(media)) => {
                debug!("Resolved '{}' to {} ({})", key.title, media.imdb_id, media.title);
                self.cache.insert(key, CachedLookup::Found(media.clone()));
                LookupOutcome::Resolved(media)
            }
            Ok(None) => {
                debug!("No match for {} '{}' ({:?})", key.media_type, key.title, key.year);
                self.cache.insert(key, CachedLookup::NotFound);
                LookupOutcome::NotFound
            }
            Err(e) => {
                self.stats.failures += 1;
                warn!(
                    "{} lookup failed for '{}' [{}]: {}",
                    self.provider.provider_name(),
                    key.title,
                    e.category(),
                    e
                );
                LookupOutcome::Failed(e.to_string())
            }
        }
    }

    fn lookup(&mut self, key: &CacheKey) -> Result<Option<ResolvedMedia>, SourceError> {
        let query = SearchQuery::new(key.title.clone(), key.year, key.media_type);
        let mut candidates = self.call(|p| p.search(&query))?;

        // Only movie searches send the year, so only they can be retried.
        let year_was_sent = key.media_type == MediaType::Movie && key.year.is_some();
        if candidates.is_empty() && year_was_sent && self.options.retry_without_year {
            debug!("No results for '{}' with year {:?}, retrying without", key.title, key.year);
            let query = query.without_year();
            candidates = self.call(|p| p.search(&query))?;
        }

        let Some(candidate) = self.ranker.pick(key, &candidates).cloned() else {
            return Ok(None);
        };

        let imdb_id = self.call(|p| p.imdb_id(candidate.media_type, candidate.tmdb_id))?;
        Ok(imdb_id.map(|imdb_id| ResolvedMedia {
            imdb_id,
            tmdb_id: candidate.tmdb_id,
            title: candidate.title,
            year: candidate.year,
            media_type: key.media_type,
        }))
    }

    fn call<T>(&mut self, request: impl FnOnce(&P) -> Result<T, SourceError>) -> Result<T, SourceError> {
        self.limiter.acquire();
        let result = request(&self.provider);
        self.limiter.complete();
        self.stats.requests += 1;
        result
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }

    pub fn into_cache(self) -> LookupCache {
        self.cache
    }

    pub fn stats(&self) -> ResolverStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::{FixedIntervalLimiter, Unlimited};
    use crate::testing::StubProvider;
    use std::time::{Duration, Instant};
    use watchlog_models::SearchCandidate;

    fn resolver(provider: StubProvider) -> MetadataResolver<StubProvider> {
        MetadataResolver::new(provider, LookupCache::new(), Box::new(Unlimited))
    }

    #[test]
    fn test_resolves_movie_with_year() {
        let provider = StubProvider::new().with_movie("The Matrix", Some(1999), 603, Some("tt0133093"));
        let mut resolver = resolver(provider);

        match resolver.resolve("The Matrix", Some(1999), false) {
            LookupOutcome::Resolved(media) => {
                assert_eq!(media.imdb_id, "tt0133093");
                assert_eq!(media.tmdb_id, 603);
                assert_eq!(media.media_type, MediaType::Movie);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(resolver.provider().search_calls(), 1);
        assert_eq!(resolver.provider().id_calls(), 1);
    }

    #[test]
    fn test_second_identical_call_served_from_cache() {
        let provider = StubProvider::new().with_movie("The Matrix", Some(1999), 603, Some("tt0133093"));
        let mut resolver = resolver(provider);

        let first = resolver.resolve("The Matrix", Some(1999), false);
        let second = resolver.resolve("The Matrix", Some(1999), false);

        assert_eq!(first, second);
        assert_eq!(resolver.provider().search_calls(), 1);
        assert_eq!(resolver.provider().id_calls(), 1);
        assert_eq!(resolver.stats().cache_hits, 1);
    }

    #[test]
    fn test_not_found_retries_without_year_and_caches_miss() {
        let mut resolver = resolver(StubProvider::new());

        assert_eq!(resolver.resolve("Xyzzy Unknown", Some(2001), false), LookupOutcome::NotFound);
        assert_eq!(resolver.provider().searches(), vec![
            ("Xyzzy Unknown".to_string(), Some(2001)),
            ("Xyzzy Unknown".to_string(), None),
        ]);
        assert_eq!(resolver.provider().id_calls(), 0);
        assert_eq!(
            resolver.cache().get(&CacheKey::new(MediaType::Movie, "Xyzzy Unknown", Some(2001))),
            Some(&CachedLookup::NotFound)
        );

        assert_eq!(resolver.resolve("Xyzzy Unknown", Some(2001), false), LookupOutcome::NotFound);
        assert_eq!(resolver.provider().search_calls(), 2);
    }

    #[test]
    fn test_retry_without_year_finds_match() {
        let provider = StubProvider::new().with_movie("Arrival", None, 329865, Some("tt2543164"));
        let mut resolver = resolver(provider);

        let outcome = resolver.resolve("Arrival", Some(2015), false);
        assert!(matches!(outcome, LookupOutcome::Resolved(ref m) if m.imdb_id == "tt2543164"));
        assert_eq!(resolver.provider().search_calls(), 2);
    }

    #[test]
    fn test_retry_disabled() {
        let provider = StubProvider::new().with_movie("Arrival", None, 329865, Some("tt2543164"));
        let mut resolver = resolver(provider).with_options(ResolverOptions { retry_without_year: false });

        assert_eq!(resolver.resolve("Arrival", Some(2015), false), LookupOutcome::NotFound);
        assert_eq!(resolver.provider().search_calls(), 1);
    }

    #[test]
    fn test_show_search_ignores_year_and_never_retries() {
        let provider = StubProvider::new().with_show("Love Island US", 117581, Some("tt10146262"));
        let mut resolver = resolver(provider);

        let outcome = resolver.resolve("Love Island US", None, true);
        assert!(matches!(outcome, LookupOutcome::Resolved(ref m) if m.media_type == MediaType::Show));

        assert_eq!(resolver.resolve("Unknown Show", Some(2019), true), LookupOutcome::NotFound);
        assert_eq!(resolver.provider().search_calls(), 2);
    }

    #[test]
    fn test_movie_and_show_namespaces_separate() {
        let provider = StubProvider::new()
            .with_movie("Fargo", None, 275, Some("tt0116282"))
            .with_show("Fargo", 60622, Some("tt2802850"));
        let mut resolver = resolver(provider);

        let movie = resolver.resolve("Fargo", None, false);
        let show = resolver.resolve("Fargo", None, true);
        assert!(matches!(movie, LookupOutcome::Resolved(ref m) if m.imdb_id == "tt0116282"));
        assert!(matches!(show, LookupOutcome::Resolved(ref m) if m.imdb_id == "tt2802850"));
        assert_eq!(resolver.cache().len(), 2);
    }

    #[test]
    fn test_missing_external_id_is_not_found() {
        let provider = StubProvider::new().with_movie("Obscure Short", None, 99, None);
        let mut resolver = resolver(provider);

        assert_eq!(resolver.resolve("Obscure Short", None, false), LookupOutcome::NotFound);
        assert_eq!(resolver.provider().id_calls(), 1);
        assert_eq!(resolver.cache().negative_count(), 1);
    }

    #[test]
    fn test_failures_logged_not_cached() {
        let provider = StubProvider::new().failing_on("Broken Title");
        let mut resolver = resolver(provider);

        assert!(matches!(resolver.resolve("Broken Title", None, false), LookupOutcome::Failed(_)));
        assert!(matches!(resolver.resolve("Broken Title", None, false), LookupOutcome::Failed(_)));
        assert_eq!(resolver.provider().search_calls(), 2);
        assert!(resolver.cache().is_empty());
        assert_eq!(resolver.stats().failures, 2);
    }

    #[test]
    fn test_rate_limit_spaces_uncached_requests() {
        let provider = StubProvider::new()
            .with_movie("A1", None, 1, Some("tt1"))
            .with_movie("A2", None, 2, Some("tt2"))
            .with_movie("A3", None, 3, Some("tt3"));
        let delay = Duration::from_millis(20);
        let mut resolver = MetadataResolver::new(
            provider,
            LookupCache::new(),
            Box::new(FixedIntervalLimiter::new(delay)),
        );

        let start = Instant::now();
        for title in ["A1", "A2", "A3"] {
            resolver.resolve(title, None, false);
        }
        let requests = resolver.stats().requests;
        assert_eq!(requests, 6);
        assert!(start.elapsed() >= delay * (requests as u32 - 1));
    }

    #[test]
    fn test_cache_hits_skip_rate_limiter() {
        let provider = StubProvider::new().with_movie("A1", None, 1, Some("tt1"));
        let mut resolver = MetadataResolver::new(
            provider,
            LookupCache::new(),
            Box::new(FixedIntervalLimiter::new(Duration::from_millis(500))),
        );
        resolver.resolve("A1", None, false);

        let start = Instant::now();
        for _ in 0..5 {
            resolver.resolve("A1", None, false);
        }
        assert!(start.elapsed() < Duration::from_millis(500));
    }

    struct NewestRanker;

    impl CandidateRanker for NewestRanker {
        fn pick<'a>(&self, _query: &CacheKey, candidates: &'a [SearchCandidate]) -> Option<&'a SearchCandidate> {
            candidates.iter().max_by_key(|c| c.year)
        }
    }

    #[test]
    fn test_custom_ranker_chooses_candidate() {
        let provider = || {
            StubProvider::new()
                .with_movie("Dune", Some(1984), 841, Some("tt0087182"))
                .with_movie("Dune", Some(2021), 438631, Some("tt1160419"))
        };

        let mut default = resolver(provider());
        assert!(matches!(default.resolve("Dune", None, false), LookupOutcome::Resolved(ref m) if m.tmdb_id == 841));

        let mut ranked = resolver(provider()).with_ranker(Box::new(NewestRanker));
        match ranked.resolve("Dune", None, false) {
            LookupOutcome::Resolved(media) => {
                assert_eq!(media.imdb_id, "tt1160419");
                assert_eq!(media.year, Some(2021));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_warm_cache_makes_no_requests() {
        let provider = StubProvider::new().with_movie("The Matrix", Some(1999), 603, Some("tt0133093"));
        let mut warm = resolver(provider);
        warm.resolve("The Matrix", Some(1999), false);
        let cache = warm.into_cache();

        let mut resolver = MetadataResolver::new(StubProvider::new(), cache, Box::new(Unlimited));
        assert!(matches!(resolver.resolve("The Matrix", Some(1999), false), LookupOutcome::Resolved(_)));
        assert_eq!(resolver.provider().search_calls(), 0);
    }
}
