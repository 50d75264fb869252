//! TTL cache wrapper for evaluation strategies.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::strategies::EvaluationStrategy;
use crate::types::responses::{round1, EvaluationResult};
use crate::types::submission::Submission;
use crate::{AssessorError, AssessorResult};

/// Suffix appended to the feedback of results served from the cache.
pub const CACHED_FEEDBACK_SUFFIX: &str = " [CACHED]";

/// Builds the cache key for a submission under a strategy name.
pub fn cache_key(strategy_name: &str, submission: &Submission) -> String {
    format!("{}:{}", strategy_name, submission.fingerprint())
}

/// Stored result.
#[derive(Debug, Clone)]
struct CacheEntry {
    result: EvaluationResult,
    inserted_at: Instant,
}

impl CacheEntry {
    /// An entry is valid while its age is strictly below the TTL.
    fn is_valid(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) < ttl
    }

    /// Derived copy handed to callers on a hit.
    fn replay(&self) -> EvaluationResult {
        let mut result = self.result.clone();
        result.feedback.push_str(CACHED_FEEDBACK_SUFFIX);
        result.metadata.insert("cached".into(), true.into());
        result.metadata.insert("cache_hit".into(), true.into());
        result.is_cached = true;
        result.timestamp = chrono::Utc::now();
        result
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    hits: u64,
    misses: u64,
}

/// Cache statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,

    /// Number of cache misses (absent or expired).
    pub misses: u64,

    /// hits + misses.
    pub total_requests: u64,

    /// Hit rate in percent, rounded to one decimal. 0 before any call.
    pub hit_rate_percent: f64,

    /// Current number of entries, expired ones included.
    pub size: usize,

    /// Configured time to live in seconds.
    pub ttl_secs: f64,
}

impl CacheStats {
    /// Hit rate as a fraction in `[0, 1]`.
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.hits as f64 / self.total_requests as f64
        }
    }
}

/// Wraps a strategy and memoizes its results per submission.
///
/// Entries are keyed by `"<strategy name>:<submission fingerprint>"` and
/// stay valid for `ttl` after insertion. Expiry is checked lazily on
/// lookup; an expired entry counts as a miss and is overwritten.
///
/// The lock is held across lookup, delegation and insertion, so concurrent
/// callers of one instance are serialized and every call is counted
/// exactly once as either a hit or a miss.
pub struct CachingWrapper<S = Arc<dyn EvaluationStrategy>> {
    inner: S,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl<S: EvaluationStrategy> CachingWrapper<S> {
    /// Creates a cache around `inner`. A zero TTL stores entries but never
    /// serves them.
    pub fn new(inner: S, ttl: Duration) -> Self {
        tracing::debug!(
            strategy = inner.name(),
            ttl_secs = ttl.as_secs_f64(),
            "Cache initialized"
        );
        Self {
            inner,
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Creates a cache from a TTL in whole seconds.
    ///
    /// Returns a configuration error for negative values.
    pub fn from_ttl_secs(inner: S, ttl_secs: i64) -> AssessorResult<Self> {
        let secs = u64::try_from(ttl_secs).map_err(|_| {
            AssessorError::config(format!("ttl_secs must not be negative (got {})", ttl_secs))
        })?;
        Ok(Self::new(inner, Duration::from_secs(secs)))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Cache key for `submission` under the wrapped strategy.
    pub fn cache_key(&self, submission: &Submission) -> String {
        cache_key(self.inner.name(), submission)
    }

    /// Drops every entry and resets the counters.
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        let dropped = state.entries.len();
        *state = CacheState::default();
        tracing::info!(strategy = self.inner.name(), dropped, "Cache cleared");
    }

    /// Returns cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        let total_requests = state.hits + state.misses;
        let hit_rate_percent = if total_requests == 0 {
            0.0
        } else {
            round1(state.hits as f64 / total_requests as f64 * 100.0)
        };

        CacheStats {
            hits: state.hits,
            misses: state.misses,
            total_requests,
            hit_rate_percent,
            size: state.entries.len(),
            ttl_secs: self.ttl.as_secs_f64(),
        }
    }

    /// Returns the current keys, sorted.
    pub async fn cached_keys(&self) -> Vec<String> {
        let state = self.state.lock().await;
        let mut keys: Vec<String> = state.entries.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl<S: EvaluationStrategy> EvaluationStrategy for CachingWrapper<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn evaluate(&self, submission: &Submission) -> EvaluationResult {
        let key = self.cache_key(submission);
        let mut state = self.state.lock().await;

        let now = Instant::now();
        let hit = state
            .entries
            .get(&key)
            .filter(|entry| entry.is_valid(self.ttl, now))
            .map(|entry| (entry.replay(), now.saturating_duration_since(entry.inserted_at)));

        if let Some((result, age)) = hit {
            state.hits += 1;
            tracing::info!(
                key = %key,
                age_secs = age.as_secs_f64(),
                "Cache HIT for '{}'",
                submission.title()
            );
            return result;
        }

        state.misses += 1;
        tracing::info!(key = %key, "Cache MISS for '{}'", submission.title());

        let started = Instant::now();
        let result = self.inner.evaluate(submission).await;
        let elapsed = started.elapsed();

        state.entries.insert(
            key,
            CacheEntry {
                result: result.clone(),
                inserted_at: Instant::now(),
            },
        );

        tracing::info!(
            elapsed_ms = elapsed.as_millis() as u64,
            "Stored result for '{}'",
            submission.title()
        );

        result
            .with_metadata("evaluation_time_ms", round1(elapsed.as_secs_f64() * 1000.0))
            .with_metadata("cache_miss", true)
    }
}
