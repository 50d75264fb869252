//! Simulated peer review strategy.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::base::{simulate_latency, EvaluationStrategy};
use crate::types::responses::{round1, EvaluationResult, Metadata, MAX_SCORE};
use crate::types::submission::Submission;
use crate::{AssessorError, AssessorResult};

/// Simulates a panel of reviewers, each scoring a different aspect of the
/// submission, and averages their scores.
///
/// The average is perturbed by a uniform value in `[-jitter, +jitter]` to
/// mimic reviewer variance, so two direct calls on the same submission may
/// disagree. Use [`with_seed`](Self::with_seed) or a zero jitter for
/// reproducible runs.
pub struct PeerReviewStrategy {
    name: String,
    reviewer_count: usize,
    jitter: f64,
    rng: Mutex<StdRng>,
    latency: Duration,
}

impl PeerReviewStrategy {
    pub const DEFAULT_REVIEWERS: usize = 3;
    pub const DEFAULT_JITTER: f64 = 5.0;
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(3000);

    /// Creates a panel of `reviewer_count` reviewers.
    ///
    /// Returns a configuration error if `reviewer_count` is zero.
    pub fn new(reviewer_count: usize) -> AssessorResult<Self> {
        if reviewer_count == 0 {
            return Err(AssessorError::config(
                "peer review needs at least one reviewer",
            ));
        }

        Ok(Self {
            // The reviewer count changes the score, so it is part of the
            // name and therefore of the cache key.
            name: format!("Peer Review Evaluation ({} reviewers)", reviewer_count),
            reviewer_count,
            jitter: Self::DEFAULT_JITTER,
            rng: Mutex::new(StdRng::from_entropy()),
            latency: Self::DEFAULT_LATENCY,
        })
    }

    /// Seeds the variance source.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Sets the half-width of the reviewer variance, clamped to
    /// `[0, MAX_SCORE]`. Non-finite values are treated as zero.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = if jitter.is_finite() {
            jitter.clamp(0.0, MAX_SCORE)
        } else {
            0.0
        };
        self
    }

    /// Sets the simulated processing latency.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn reviewer_count(&self) -> usize {
        self.reviewer_count
    }

    /// Scores from each reviewer, before averaging and variance.
    pub fn reviewer_scores(&self, submission: &Submission) -> Vec<(f64, &'static str)> {
        let content = submission.content();

        (0..self.reviewer_count)
            .map(|i| match i {
                0 => {
                    let chars = content.chars().count() as f64;
                    ((chars / 30.0).min(100.0), "Methodology: Strong approach")
                }
                1 => {
                    let words = submission.word_count() as f64;
                    ((words / 20.0).min(100.0), "Results: Well-presented")
                }
                _ => {
                    let sentences = content
                        .chars()
                        .filter(|c| matches!(c, '.' | '!' | '?'))
                        .count() as f64;
                    ((sentences * 5.0).min(100.0), "Writing: Clear and concise")
                }
            })
            .collect()
    }

    fn variance(&self) -> f64 {
        if self.jitter == 0.0 {
            return 0.0;
        }
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(-self.jitter..=self.jitter)
    }

    /// Scoring step, without the simulated latency.
    pub fn score(&self, submission: &Submission) -> EvaluationResult {
        let reviews = self.reviewer_scores(submission);
        let scores: Vec<f64> = reviews.iter().map(|(score, _)| *score).collect();
        let feedback: Vec<&str> = reviews.iter().map(|(_, text)| *text).collect();

        let average = scores.iter().sum::<f64>() / scores.len() as f64;
        let score = average + self.variance();

        let max = scores.iter().copied().fold(f64::MIN, f64::max);
        let min = scores.iter().copied().fold(f64::MAX, f64::min);

        let mut metadata = Metadata::new();
        metadata.insert("strategy".into(), "peer_review".into());
        metadata.insert("reviewers_count".into(), self.reviewer_count.into());
        metadata.insert(
            "individual_scores".into(),
            scores.iter().map(|s| round1(*s)).collect::<Vec<_>>().into(),
        );
        metadata.insert("score_variance".into(), round1(max - min).into());
        metadata.insert(
            "processing_time_ms".into(),
            (self.latency.as_millis() as u64).into(),
        );

        EvaluationResult::new(score, feedback.join(" | "), metadata)
    }
}

#[async_trait]
impl EvaluationStrategy for PeerReviewStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn evaluate(&self, submission: &Submission) -> EvaluationResult {
        tracing::debug!(
            strategy = %self.name,
            submission_id = submission.submission_id(),
            reviewers = self.reviewer_count,
            "Evaluating '{}'",
            submission.title()
        );
        simulate_latency(self.latency).await;
        self.score(submission)
    }
}
