//! Evaluation result types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowest possible score.
pub const MIN_SCORE: f64 = 0.0;

/// Highest possible score.
pub const MAX_SCORE: f64 = 100.0;

/// Strategy-specific metadata, ordered by key.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<MetadataValue>),
    Map(BTreeMap<String, MetadataValue>),
}

impl MetadataValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetadataValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[MetadataValue]> {
        match self {
            MetadataValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        MetadataValue::Bool(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Number(value)
    }
}

impl From<usize> for MetadataValue {
    fn from(value: usize) -> Self {
        MetadataValue::Number(value as f64)
    }
}

impl From<u64> for MetadataValue {
    fn from(value: u64) -> Self {
        MetadataValue::Number(value as f64)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::Text(value)
    }
}

impl<T: Into<MetadataValue>> From<Vec<T>> for MetadataValue {
    fn from(values: Vec<T>) -> Self {
        MetadataValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Rounds to one decimal place, the precision used in metadata.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Clamps a raw score into `[MIN_SCORE, MAX_SCORE]`.
///
/// NaN collapses to the minimum.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        MIN_SCORE
    } else {
        score.clamp(MIN_SCORE, MAX_SCORE)
    }
}

/// Result of evaluating a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Score (0-100).
    pub score: f64,

    /// Human readable feedback.
    pub feedback: String,

    /// Strategy-specific metadata.
    pub metadata: Metadata,

    /// When the result was produced.
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Whether the result was served from a cache.
    pub is_cached: bool,
}

impl EvaluationResult {
    /// Creates a fresh result. The score is clamped.
    pub fn new(score: f64, feedback: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            score: clamp_score(score),
            feedback: feedback.into(),
            metadata,
            timestamp: chrono::Utc::now(),
            is_cached: false,
        }
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Looks up a metadata entry.
    pub fn meta(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }
}

impl std::fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache_indicator = if self.is_cached { " [CACHED]" } else { "" };
        let preview: String = self.feedback.chars().take(60).collect();
        write!(
            f,
            "Score: {:.2}/100{} | {}",
            self.score, cache_indicator, preview
        )?;
        if self.feedback.chars().count() > 60 {
            write!(f, "...")?;
        }
        Ok(())
    }
}
