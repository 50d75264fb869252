//! Configuration for Assessor.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::strategies::StrategyKind;
use crate::types::responses::MAX_SCORE;
use crate::{AssessorError, AssessorResult};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "assessor.toml";

/// Main configuration for Assessor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Strategy selection and tuning.
    #[serde(default)]
    pub strategy: StrategyConfig,

    /// Cache settings.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Audit log settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// General settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Strategy settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Which strategy to run.
    #[serde(default)]
    pub kind: StrategyKind,

    /// Overrides the simulated processing latency (in milliseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,

    /// Peer review settings.
    #[serde(default)]
    pub peer_review: PeerReviewConfig,

    /// ML heuristic settings.
    #[serde(default)]
    pub ml: MlConfig,
}

/// Peer review settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerReviewConfig {
    /// Number of simulated reviewers (>= 1).
    #[serde(default = "default_reviewer_count")]
    pub reviewer_count: usize,

    /// Half-width of the uniform reviewer variance.
    #[serde(default = "default_jitter")]
    pub jitter: f64,

    /// Seed for the variance source. Random when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for PeerReviewConfig {
    fn default() -> Self {
        Self {
            reviewer_count: default_reviewer_count(),
            jitter: default_jitter(),
            seed: None,
        }
    }
}

fn default_reviewer_count() -> usize {
    3
}

fn default_jitter() -> f64 {
    5.0
}

/// ML heuristic settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlConfig {
    /// Label reported in feedback and metadata.
    #[serde(default = "default_model_label")]
    pub model_label: String,
}

impl Default for MlConfig {
    fn default() -> Self {
        Self {
            model_label: default_model_label(),
        }
    }
}

fn default_model_label() -> String {
    crate::strategies::DEFAULT_MODEL_LABEL.to_string()
}

/// Cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Entry time to live in seconds. 0 disables reuse; negative is invalid.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_ttl() -> i64 {
    3600 // 1 hour
}

/// Audit log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> AssessorResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> AssessorResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Checks values that serde cannot reject on its own.
    pub fn validate(&self) -> AssessorResult<()> {
        if self.cache.ttl_secs < 0 {
            return Err(AssessorError::config(format!(
                "cache.ttl_secs must not be negative (got {})",
                self.cache.ttl_secs
            )));
        }

        if self.strategy.peer_review.reviewer_count == 0 {
            return Err(AssessorError::config(
                "strategy.peer_review.reviewer_count must be at least 1",
            ));
        }

        let jitter = self.strategy.peer_review.jitter;
        if !jitter.is_finite() || !(0.0..=MAX_SCORE).contains(&jitter) {
            return Err(AssessorError::config(format!(
                "strategy.peer_review.jitter must be between 0 and {} (got {})",
                MAX_SCORE,
                jitter
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default_config();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.strategy.kind, StrategyKind::MlHeuristic);
        assert_eq!(config.strategy.peer_review.reviewer_count, 3);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert!(config.cache.enabled);
        assert!(config.audit.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [cache]
            ttl_secs = 30

            [strategy]
            kind = "peer_review"
            latency_ms = 0

            [strategy.peer_review]
            reviewer_count = 2
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.cache.ttl_secs, 30);
        assert!(config.cache.enabled);
        assert_eq!(config.strategy.kind, StrategyKind::PeerReview);
        assert_eq!(config.strategy.latency_ms, Some(0));
        assert_eq!(config.strategy.peer_review.reviewer_count, 2);
        assert_eq!(config.strategy.peer_review.seed, Some(7));
        assert_eq!(config.strategy.peer_review.jitter, 5.0);
        assert_eq!(config.general.log_format, "text");
    }

    #[test]
    fn test_negative_ttl_is_rejected() {
        let mut config = Config::default_config();
        config.cache.ttl_secs = -1;
        assert!(matches!(config.validate(), Err(AssessorError::Config(_))));

        config.cache.ttl_secs = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_reviewers_is_rejected() {
        let mut config = Config::default_config();
        config.strategy.peer_review.reviewer_count = 0;
        assert!(matches!(config.validate(), Err(AssessorError::Config(_))));
    }

    #[test]
    fn test_negative_jitter_is_rejected() {
        let mut config = Config::default_config();
        config.strategy.peer_review.jitter = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_jitter_above_score_range_is_rejected() {
        let mut config = Config::default_config();
        config.strategy.peer_review.jitter = 1e308;
        assert!(matches!(config.validate(), Err(AssessorError::Config(_))));

        config.strategy.peer_review.jitter = 100.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        let mut config = Config::default_config();
        config.cache.ttl_secs = 30;
        config.strategy.ml.model_label = "scibert-research-v2".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[cache]\nttl_secs = -5\n").unwrap();

        assert!(matches!(Config::load(&path), Err(AssessorError::Config(_))));
    }
}
