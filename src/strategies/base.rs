//! Base trait for evaluation strategies.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::types::responses::EvaluationResult;
use crate::types::submission::Submission;

/// Trait for submission evaluation strategies.
///
/// Concrete strategies and the wrappers around them (cache, audit log)
/// implement the same trait, so any of them can wrap any other.
#[async_trait]
pub trait EvaluationStrategy: Send + Sync {
    /// Returns the strategy name.
    ///
    /// Wrappers report the name of what they wrap. The name is part of the
    /// cache key, so differently configured strategies should report
    /// different names.
    fn name(&self) -> &str;

    /// Evaluates a submission.
    ///
    /// Never fails: empty or odd content yields a low, clamped score.
    async fn evaluate(&self, submission: &Submission) -> EvaluationResult;
}

#[async_trait]
impl<T: EvaluationStrategy + ?Sized> EvaluationStrategy for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn evaluate(&self, submission: &Submission) -> EvaluationResult {
        (**self).evaluate(submission).await
    }
}

#[async_trait]
impl<T: EvaluationStrategy + ?Sized> EvaluationStrategy for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn evaluate(&self, submission: &Submission) -> EvaluationResult {
        (**self).evaluate(submission).await
    }
}

/// Blocks the calling task for the simulated processing cost.
pub(crate) async fn simulate_latency(latency: Duration) {
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}
