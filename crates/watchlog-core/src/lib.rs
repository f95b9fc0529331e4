pub mod cache;
pub mod cache_storage;
pub mod export;
pub mod generator;
pub mod normalizer;
pub mod ranking;
pub mod rate_limit;
pub mod resolver;
pub mod snapshot;
pub mod stats;
pub mod summary;
pub mod timestamp;

#[cfg(test)]
mod testing;

pub use cache::{CacheKey, CachedLookup, LookupCache};
pub use cache_storage::LookupCacheStorage;
pub use generator::{BatchResult, ImportGenerator};
pub use normalizer::normalize;
pub use ranking::{CandidateRanker, FirstResultRanker};
pub use rate_limit::{FixedIntervalLimiter, RateLimiter, Unlimited};
pub use resolver::{LookupOutcome, MetadataResolver, ResolverOptions, ResolverStats};
pub use stats::HistoryStats;
pub use summary::{BatchSummary, SkipReason};
pub use timestamp::parse_watch_time;
