//! Evaluation strategies.
//!
//! Each strategy scores a [`Submission`](crate::types::submission::Submission)
//! on a 0-100 scale after a simulated processing delay:
//!
//! - [`RuleBasedStrategy`] - additive checks on length, sections, references and formatting
//! - [`PeerReviewStrategy`] - averaged reviewer panel with random variance
//! - [`MlHeuristicStrategy`] - lexical diversity, novelty and technical density

mod base;
mod ml_heuristic;
mod peer_review;
mod rule_based;

pub use base::EvaluationStrategy;
pub use ml_heuristic::{MlFeatures, MlHeuristicStrategy, DEFAULT_MODEL_LABEL};
pub use peer_review::PeerReviewStrategy;
pub use rule_based::{RuleBasedStrategy, RuleSet};

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::config::StrategyConfig;
use crate::{AssessorError, AssessorResult};

/// Selects one of the built-in strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    RuleBased,
    PeerReview,
    #[default]
    #[serde(rename = "ml")]
    MlHeuristic,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::RuleBased,
        StrategyKind::PeerReview,
        StrategyKind::MlHeuristic,
    ];

    /// Default simulated latency of the strategy.
    pub fn default_latency(&self) -> Duration {
        match self {
            StrategyKind::RuleBased => RuleBasedStrategy::DEFAULT_LATENCY,
            StrategyKind::PeerReview => PeerReviewStrategy::DEFAULT_LATENCY,
            StrategyKind::MlHeuristic => MlHeuristicStrategy::DEFAULT_LATENCY,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::RuleBased => "word count, required sections, references and formatting",
            StrategyKind::PeerReview => "averaged reviewer panel with random variance",
            StrategyKind::MlHeuristic => "lexical diversity, novelty and technical term density",
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::RuleBased => write!(f, "rule_based"),
            StrategyKind::PeerReview => write!(f, "peer_review"),
            StrategyKind::MlHeuristic => write!(f, "ml"),
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = AssessorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "rule_based" | "rules" => Ok(StrategyKind::RuleBased),
            "peer_review" | "peer" => Ok(StrategyKind::PeerReview),
            "ml" | "ml_heuristic" => Ok(StrategyKind::MlHeuristic),
            _ => Err(AssessorError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Builds the strategy described by `config`.
pub fn build_strategy(config: &StrategyConfig) -> AssessorResult<Arc<dyn EvaluationStrategy>> {
    let latency = config
        .latency_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.kind.default_latency());

    let strategy: Arc<dyn EvaluationStrategy> = match config.kind {
        StrategyKind::RuleBased => Arc::new(RuleBasedStrategy::new().with_latency(latency)),
        StrategyKind::PeerReview => {
            let peer = &config.peer_review;
            let mut strategy = PeerReviewStrategy::new(peer.reviewer_count)?
                .with_jitter(peer.jitter)
                .with_latency(latency);
            if let Some(seed) = peer.seed {
                strategy = strategy.with_seed(seed);
            }
            Arc::new(strategy)
        }
        StrategyKind::MlHeuristic => Arc::new(
            MlHeuristicStrategy::new(config.ml.model_label.clone()).with_latency(latency),
        ),
    };

    tracing::debug!(
        kind = %config.kind,
        name = strategy.name(),
        latency_ms = latency.as_millis() as u64,
        "Strategy built"
    );

    Ok(strategy)
}
