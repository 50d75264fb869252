//! Deterministic stand-in for a trained scoring model.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;

use super::base::{simulate_latency, EvaluationStrategy};
use crate::types::responses::{round1, EvaluationResult, Metadata};
use crate::types::submission::Submission;

/// Default label reported by [`MlHeuristicStrategy`].
pub const DEFAULT_MODEL_LABEL: &str = "scibert-research-2024";

const STOPWORDS: &[&str] = &["the", "and", "of", "to", "in", "a", "is", "that", "for", "it"];

const TECHNICAL_TERMS: &[&str] = &[
    "algorithm",
    "methodology",
    "analysis",
    "experiment",
    "results",
    "conclusion",
    "data",
    "model",
    "parameter",
    "validation",
];

const COMPLEXITY_WEIGHT: f64 = 0.4;
const NOVELTY_WEIGHT: f64 = 0.3;
const TECHNICAL_WEIGHT: f64 = 0.3;

/// Component scores computed by [`MlHeuristicStrategy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MlFeatures {
    /// Lexical diversity (unique / total tokens) scaled to 70.
    pub complexity: f64,
    /// Tokens outside the stopword list, one point per ten, capped at 100.
    pub novelty: f64,
    /// Fifteen points per technical term present, capped at 100.
    pub technical: f64,
}

impl MlFeatures {
    pub fn extract(content: &str) -> Self {
        let lower = content.to_lowercase();
        let tokens: Vec<&str> = lower.split_whitespace().collect();

        let unique: HashSet<&str> = tokens.iter().copied().collect();
        let complexity = unique.len() as f64 / tokens.len().max(1) as f64 * 70.0;

        let rare = tokens.iter().filter(|t| !STOPWORDS.contains(t)).count();
        let novelty = (rare as f64 / 10.0).min(100.0);

        let terms = TECHNICAL_TERMS
            .iter()
            .filter(|term| lower.contains(*term))
            .count();
        let technical = (terms as f64 * 15.0).min(100.0);

        Self {
            complexity,
            novelty,
            technical,
        }
    }

    /// Weighted combination, unclamped.
    pub fn combined(&self) -> f64 {
        self.complexity * COMPLEXITY_WEIGHT
            + self.novelty * NOVELTY_WEIGHT
            + self.technical * TECHNICAL_WEIGHT
    }
}

/// Scores lexical diversity, novelty and technical density.
///
/// The model label only shows up in feedback and metadata.
pub struct MlHeuristicStrategy {
    model_label: String,
    latency: Duration,
}

impl MlHeuristicStrategy {
    pub const NAME: &'static str = "ML-Based Evaluation";
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(5000);

    pub fn new(model_label: impl Into<String>) -> Self {
        Self {
            model_label: model_label.into(),
            latency: Self::DEFAULT_LATENCY,
        }
    }

    /// Sets the simulated inference latency.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn model_label(&self) -> &str {
        &self.model_label
    }

    /// Scoring step, without the simulated latency.
    pub fn score(&self, submission: &Submission) -> EvaluationResult {
        let features = MlFeatures::extract(submission.content());

        let feedback = format!(
            "{}: Complexity={:.1}, Novelty={:.1}, Technical={:.1}",
            self.model_label, features.complexity, features.novelty, features.technical
        );

        let mut metadata = Metadata::new();
        metadata.insert("strategy".into(), "ml_based".into());
        metadata.insert("model_used".into(), self.model_label.clone().into());
        metadata.insert("complexity_score".into(), round1(features.complexity).into());
        metadata.insert("novelty_score".into(), round1(features.novelty).into());
        metadata.insert("technical_score".into(), round1(features.technical).into());
        metadata.insert(
            "inference_time_ms".into(),
            (self.latency.as_millis() as u64).into(),
        );

        EvaluationResult::new(features.combined(), feedback, metadata)
    }
}

impl Default for MlHeuristicStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_LABEL)
    }
}

#[async_trait]
impl EvaluationStrategy for MlHeuristicStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn evaluate(&self, submission: &Submission) -> EvaluationResult {
        tracing::debug!(
            strategy = Self::NAME,
            model = %self.model_label,
            submission_id = submission.submission_id(),
            "Evaluating '{}'",
            submission.title()
        );
        simulate_latency(self.latency).await;
        self.score(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCKCHAIN: &str = "Abstract: Blockchain technology... Methodology: Smart contracts... \
                              Results: Efficiency improved by 40%...";

    #[test]
    fn test_features_for_short_abstract() {
        // 11 distinct tokens, no stopwords, two technical terms
        let features = MlFeatures::extract(BLOCKCHAIN);
        assert!((features.complexity - 70.0).abs() < 1e-9);
        assert!((features.novelty - 1.1).abs() < 1e-9);
        assert!((features.technical - 30.0).abs() < 1e-9);
        assert!((features.combined() - 37.33).abs() < 1e-9);
    }

    #[test]
    fn test_stopwords_and_repetition() {
        let features = MlFeatures::extract("the the the data");
        assert!((features.complexity - 35.0).abs() < 1e-9);
        assert!((features.novelty - 0.1).abs() < 1e-9);
        assert_eq!(features.technical, 15.0);
    }

    #[test]
    fn test_technical_terms_are_capped() {
        let features = MlFeatures::extract(&TECHNICAL_TERMS.join(" "));
        assert_eq!(features.technical, 100.0);
    }

    #[test]
    fn test_empty_content() {
        let result = MlHeuristicStrategy::default().score(&Submission::new("S1", "E", "", "a"));
        assert_eq!(result.score, 0.0);
        assert_eq!(
            result.feedback,
            "scibert-research-2024: Complexity=0.0, Novelty=0.0, Technical=0.0"
        );
    }

    #[test]
    fn test_label_only_affects_reporting() {
        let sub = Submission::new("S1", "T", BLOCKCHAIN, "a");
        let a = MlHeuristicStrategy::new("model-a").score(&sub);
        let b = MlHeuristicStrategy::new("model-b").score(&sub);

        assert_eq!(a.score, b.score);
        assert!(a.feedback.starts_with("model-a: "));
        assert_eq!(b.meta("model_used").and_then(|v| v.as_str()), Some("model-b"));
    }

    #[test]
    fn test_deterministic() {
        let strategy = MlHeuristicStrategy::default();
        let sub = Submission::new("S1", "T", BLOCKCHAIN, "a");
        let first = strategy.score(&sub);
        let second = strategy.score(&sub);

        assert_eq!(first.score, second.score);
        assert_eq!(first.metadata, second.metadata);
    }

    #[test]
    fn test_metadata() {
        let result = MlHeuristicStrategy::default().score(&Submission::new("S1", "T", BLOCKCHAIN, "a"));
        assert_eq!(result.meta("strategy").and_then(|v| v.as_str()), Some("ml_based"));
        assert_eq!(result.meta("complexity_score").and_then(|v| v.as_f64()), Some(70.0));
        assert_eq!(result.meta("novelty_score").and_then(|v| v.as_f64()), Some(1.1));
        assert_eq!(result.meta("technical_score").and_then(|v| v.as_f64()), Some(30.0));
        assert_eq!(result.meta("inference_time_ms").and_then(|v| v.as_f64()), Some(5000.0));
    }
}
