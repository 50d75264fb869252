//! # Assessor
//!
//! Evaluates submitted documents with interchangeable scoring strategies
//! and memoizes the results so repeated evaluations skip the expensive work.
//!
//! Strategies and the wrappers around them share one trait,
//! [`EvaluationStrategy`](strategies::EvaluationStrategy), so caching and
//! audit logging stack in any order and to any depth.
//!
//! ## Modules
//!
//! - [`strategies`] - Rule-based, peer review and ML heuristic scorers
//! - [`cache`] - TTL cache wrapper with hit/miss accounting
//! - [`audit`] - Audit logging wrapper
//! - [`chain`] - Builder for wrapper chains
//! - [`cli`] - Command line interface
//! - [`types`] - Shared types

pub mod audit;
pub mod cache;
#[cfg(feature = "cli")]
pub mod cli;
pub mod chain;
pub mod strategies;
pub mod types;

pub use types::config::Config;
pub use types::errors::{AssessorError, AssessorResult};
pub use types::{EvaluationResult, Submission};
