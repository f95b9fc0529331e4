use crate::cache::CacheKey;
use watchlog_models::SearchCandidate;

/// Picks the candidate to resolve from a search result list.
pub trait CandidateRanker {
    fn pick<'a>(&self, query: &CacheKey, candidates: &'a [SearchCandidate]) -> Option<&'a SearchCandidate>;
}

/// Trusts the provider's own relevance order.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstResultRanker;

impl CandidateRanker for FirstResultRanker {
    fn pick<'a>(&self, _query: &CacheKey, candidates: &'a [SearchCandidate]) -> Option<&'a SearchCandidate> {
        candidates.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use watchlog_models::MediaType;

    #[test]
    fn test_first_result_wins() {
        let candidates = vec![
            SearchCandidate { tmdb_id: 2, title: "Second Best".into(), year: None, media_type: MediaType::Movie },
            SearchCandidate { tmdb_id: 1, title: "Exact".into(), year: Some(1999), media_type: MediaType::Movie },
        ];
        let key = CacheKey::new(MediaType::Movie, "Exact", Some(1999));
        assert_eq!(FirstResultRanker.pick(&key, &candidates).map(|c| c.tmdb_id), Some(2));
        assert!(FirstResultRanker.pick(&key, &[]).is_none());
    }
}
