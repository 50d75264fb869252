//! Shared types.

pub mod config;
pub mod errors;
pub mod responses;
pub mod submission;

pub use responses::{EvaluationResult, Metadata, MetadataValue};
pub use submission::Submission;
