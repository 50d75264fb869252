//! TTL cache for evaluation results.
//!
//! [`CachingWrapper`] wraps any [`EvaluationStrategy`](crate::strategies::EvaluationStrategy)
//! and replays earlier results for the same submission until they expire,
//! avoiding repeated runs of expensive strategies.

mod ttl;

pub use ttl::{cache_key, CacheStats, CachingWrapper, CACHED_FEEDBACK_SUFFIX};
