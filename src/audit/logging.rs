//! Audit logging wrapper.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::strategies::EvaluationStrategy;
use crate::types::responses::{round1, EvaluationResult};
use crate::types::submission::Submission;

/// One evaluation call seen by a [`LoggingWrapper`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub submission_id: String,
    pub title: String,

    /// Strategy name as reported by the wrapped chain.
    pub strategy: String,

    pub score: f64,

    /// Wall-clock time of the delegated call, in milliseconds.
    pub duration_ms: f64,

    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Cache provenance of the result the wrapper received.
    pub cached: bool,
}

impl AuditRecord {
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_ms.max(0.0) / 1000.0)
    }
}

/// Aggregates over an audit log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total_evaluations: usize,
    pub cached_evaluations: usize,
    pub average_score: f64,
    pub average_duration_ms: f64,
}

impl AuditSummary {
    fn from_records(records: &[AuditRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let total = records.len() as f64;
        Self {
            total_evaluations: records.len(),
            cached_evaluations: records.iter().filter(|r| r.cached).count(),
            average_score: records.iter().map(|r| r.score).sum::<f64>() / total,
            average_duration_ms: records.iter().map(|r| r.duration_ms).sum::<f64>() / total,
        }
    }
}

/// Records every call that passes through it.
///
/// Placed outside a [`CachingWrapper`](crate::cache::CachingWrapper) it sees
/// every call, hits included; placed inside, it only sees misses.
pub struct LoggingWrapper<S = Arc<dyn EvaluationStrategy>> {
    inner: S,
    records: Mutex<Vec<AuditRecord>>,
}

impl<S: EvaluationStrategy> LoggingWrapper<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns the records in call order.
    pub async fn logs(&self) -> Vec<AuditRecord> {
        self.records.lock().await.clone()
    }

    /// Number of recorded calls.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    pub async fn summary(&self) -> AuditSummary {
        AuditSummary::from_records(&self.records.lock().await)
    }
}

#[async_trait]
impl<S: EvaluationStrategy> EvaluationStrategy for LoggingWrapper<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn evaluate(&self, submission: &Submission) -> EvaluationResult {
        tracing::debug!(
            submission_id = submission.submission_id(),
            "Starting evaluation of '{}'",
            submission.title()
        );

        let started = Instant::now();
        let result = self.inner.evaluate(submission).await;
        let duration = started.elapsed();

        let record = AuditRecord {
            submission_id: submission.submission_id().to_string(),
            title: submission.title().to_string(),
            strategy: self.inner.name().to_string(),
            score: result.score,
            duration_ms: round1(duration.as_secs_f64() * 1000.0),
            timestamp: chrono::Utc::now(),
            cached: result.is_cached,
        };

        tracing::info!(
            submission_id = %record.submission_id,
            strategy = %record.strategy,
            score = record.score,
            duration_ms = record.duration_ms,
            cached = record.cached,
            "Evaluation completed"
        );

        self.records.lock().await.push(record);
        result
    }
}
