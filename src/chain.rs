//! Wrapper chain composition.
//!
//! Wrappers are stacked innermost first:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use std::time::Duration;
//! # use assessor::chain::EvaluatorChain;
//! # use assessor::strategies::MlHeuristicStrategy;
//! let chain = EvaluatorChain::builder(Arc::new(MlHeuristicStrategy::default()))
//!     .cached(Duration::from_secs(30))
//!     .logged()
//!     .build();
//! ```
//!
//! gives `logging -> cache -> strategy`. The order matters: a logging layer
//! outside a cache records hits, one inside only records misses.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::audit::{AuditRecord, LoggingWrapper};
use crate::cache::{CacheStats, CachingWrapper};
use crate::strategies::{build_strategy, EvaluationStrategy};
use crate::types::config::Config;
use crate::types::responses::EvaluationResult;
use crate::types::submission::Submission;
use crate::AssessorResult;

/// One layer of a chain, innermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Strategy,
    Cache,
    Logging,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::Strategy => write!(f, "strategy"),
            Layer::Cache => write!(f, "cache"),
            Layer::Logging => write!(f, "logging"),
        }
    }
}

/// Builder for [`EvaluatorChain`].
pub struct ChainBuilder {
    current: Arc<dyn EvaluationStrategy>,
    layers: Vec<Layer>,
    caches: Vec<Arc<CachingWrapper>>,
    loggers: Vec<Arc<LoggingWrapper>>,
}

impl ChainBuilder {
    /// Wraps everything built so far in a cache.
    #[must_use]
    pub fn cached(mut self, ttl: Duration) -> Self {
        let cache = Arc::new(CachingWrapper::new(self.current, ttl));
        self.caches.push(cache.clone());
        self.layers.push(Layer::Cache);
        self.current = cache;
        self
    }

    /// Like [`cached`](Self::cached) with a TTL in seconds; rejects
    /// negative values.
    pub fn cached_secs(mut self, ttl_secs: i64) -> AssessorResult<Self> {
        let cache = Arc::new(CachingWrapper::from_ttl_secs(self.current, ttl_secs)?);
        self.caches.push(cache.clone());
        self.layers.push(Layer::Cache);
        self.current = cache;
        Ok(self)
    }

    /// Wraps everything built so far in an audit logger.
    #[must_use]
    pub fn logged(mut self) -> Self {
        let logger = Arc::new(LoggingWrapper::new(self.current));
        self.loggers.push(logger.clone());
        self.layers.push(Layer::Logging);
        self.current = logger;
        self
    }

    pub fn build(self) -> EvaluatorChain {
        EvaluatorChain {
            outer: self.current,
            layers: self.layers,
            caches: self.caches,
            loggers: self.loggers,
        }
    }
}

/// A strategy with its wrappers, plus handles to every wrapper so their
/// stats and logs stay reachable.
pub struct EvaluatorChain {
    outer: Arc<dyn EvaluationStrategy>,
    layers: Vec<Layer>,
    caches: Vec<Arc<CachingWrapper>>,
    loggers: Vec<Arc<LoggingWrapper>>,
}

impl EvaluatorChain {
    pub fn builder(strategy: Arc<dyn EvaluationStrategy>) -> ChainBuilder {
        ChainBuilder {
            current: strategy,
            layers: vec![Layer::Strategy],
            caches: Vec::new(),
            loggers: Vec::new(),
        }
    }

    /// Builds `strategy -> cache -> logging` as enabled in `config`.
    pub fn from_config(config: &Config) -> AssessorResult<Self> {
        config.validate()?;

        let mut builder = Self::builder(build_strategy(&config.strategy)?);
        if config.cache.enabled {
            builder = builder.cached_secs(config.cache.ttl_secs)?;
        }
        if config.audit.enabled {
            builder = builder.logged();
        }

        let chain = builder.build();
        tracing::debug!(layers = %chain.describe(), "Evaluator chain built");
        Ok(chain)
    }

    /// Layers, innermost first.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Human readable layer order, outermost first.
    pub fn describe(&self) -> String {
        self.layers
            .iter()
            .rev()
            .map(|layer| layer.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Cache layers, innermost first.
    pub fn caches(&self) -> &[Arc<CachingWrapper>] {
        &self.caches
    }

    /// Logging layers, innermost first.
    pub fn loggers(&self) -> &[Arc<LoggingWrapper>] {
        &self.loggers
    }

    /// Stats of the innermost cache, if any.
    pub async fn cache_stats(&self) -> Option<CacheStats> {
        match self.caches.first() {
            Some(cache) => Some(cache.stats().await),
            None => None,
        }
    }

    /// Records of the outermost logger, if any.
    pub async fn audit_log(&self) -> Vec<AuditRecord> {
        match self.loggers.last() {
            Some(logger) => logger.logs().await,
            None => Vec::new(),
        }
    }
}

#[async_trait]
impl EvaluationStrategy for EvaluatorChain {
    fn name(&self) -> &str {
        self.outer.name()
    }

    async fn evaluate(&self, submission: &Submission) -> EvaluationResult {
        self.outer.evaluate(submission).await
    }
}
