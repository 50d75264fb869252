//! Rule-based strategy.

use std::time::Duration;

use async_trait::async_trait;

use super::base::{simulate_latency, EvaluationStrategy};
use crate::types::responses::{EvaluationResult, Metadata};
use crate::types::submission::Submission;

const WORD_COUNT_POINTS: f64 = 30.0;
const SECTIONS_POINTS: f64 = 40.0;
const REFERENCES_POINTS: f64 = 20.0;
const FORMATTING_POINTS: f64 = 10.0;

/// Minimum word count for the formatting check (exclusive).
const FORMATTING_MIN_WORDS: usize = 50;

/// Thresholds applied by [`RuleBasedStrategy`].
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub min_word_count: usize,
    pub max_word_count: usize,
    pub required_sections: Vec<String>,
    pub min_references: usize,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            min_word_count: 1000,
            max_word_count: 10000,
            required_sections: vec![
                "abstract".to_string(),
                "methodology".to_string(),
                "results".to_string(),
            ],
            min_references: 5,
        }
    }
}

/// Scores a submission additively from four independent checks:
/// word-count band (30), required sections (40 split evenly),
/// references (20) and basic formatting (10).
pub struct RuleBasedStrategy {
    rules: RuleSet,
    latency: Duration,
}

impl RuleBasedStrategy {
    pub const NAME: &'static str = "Rule-Based Evaluation";
    pub const DEFAULT_LATENCY: Duration = Duration::from_millis(1500);

    pub fn new() -> Self {
        Self {
            rules: RuleSet::default(),
            latency: Self::DEFAULT_LATENCY,
        }
    }

    /// Sets the simulated processing latency.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Pure scoring step, without the simulated latency.
    pub fn score(&self, submission: &Submission) -> EvaluationResult {
        let rules = &self.rules;
        let word_count = submission.word_count();
        let mut score = 0.0;
        let mut feedback_parts = Vec::new();

        if (rules.min_word_count..=rules.max_word_count).contains(&word_count) {
            score += WORD_COUNT_POINTS;
            feedback_parts.push(format!("Word count OK ({})", word_count));
        } else if word_count < rules.min_word_count {
            feedback_parts.push(format!(
                "Too short ({}/{})",
                word_count, rules.min_word_count
            ));
        } else {
            feedback_parts.push(format!(
                "Too long ({}/{})",
                word_count, rules.max_word_count
            ));
        }

        let content_lower = submission.content().to_lowercase();
        let per_section = if rules.required_sections.is_empty() {
            0.0
        } else {
            SECTIONS_POINTS / rules.required_sections.len() as f64
        };
        let sections_found: Vec<String> = rules
            .required_sections
            .iter()
            .filter(|section| content_lower.contains(section.as_str()))
            .cloned()
            .collect();
        score += per_section * sections_found.len() as f64;
        if !sections_found.is_empty() {
            feedback_parts.push(format!("Sections: {}", sections_found.join(", ")));
        }

        let reference_count =
            content_lower.matches("reference").count() + content_lower.matches("cite").count();
        if reference_count >= rules.min_references {
            score += REFERENCES_POINTS;
            feedback_parts.push(format!("References sufficient ({})", reference_count));
        } else {
            feedback_parts.push(format!(
                "References insufficient ({}/{})",
                reference_count, rules.min_references
            ));
        }

        if submission.content().contains('.') && word_count > FORMATTING_MIN_WORDS {
            score += FORMATTING_POINTS;
            feedback_parts.push("Proper formatting".to_string());
        }

        let mut metadata = Metadata::new();
        metadata.insert("strategy".into(), "rule_based".into());
        metadata.insert("word_count".into(), word_count.into());
        metadata.insert("sections_found".into(), sections_found.into());
        metadata.insert("reference_count".into(), reference_count.into());
        metadata.insert(
            "processing_time_ms".into(),
            (self.latency.as_millis() as u64).into(),
        );

        EvaluationResult::new(score, feedback_parts.join("; "), metadata)
    }
}

impl Default for RuleBasedStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EvaluationStrategy for RuleBasedStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn evaluate(&self, submission: &Submission) -> EvaluationResult {
        tracing::debug!(
            strategy = Self::NAME,
            submission_id = submission.submission_id(),
            "Evaluating '{}'",
            submission.title()
        );
        simulate_latency(self.latency).await;
        self.score(submission)
    }
}
