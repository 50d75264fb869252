//! Error types for Assessor.

use thiserror::Error;

/// Default result type for Assessor.
pub type AssessorResult<T> = Result<T, AssessorError>;

/// Errors that can occur in Assessor.
///
/// Evaluation itself never fails: empty or malformed content degrades to a
/// low score. Errors only come from configuration and the surrounding IO.
#[derive(Error, Debug)]
pub enum AssessorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown strategy '{0}' (expected rule_based, peer_review or ml)")]
    UnknownStrategy(String),

    #[error("{0}")]
    Other(String),
}

impl AssessorError {
    /// Creates a generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = AssessorError::config("ttl_secs must not be negative (got -1)");
        assert_eq!(
            err.to_string(),
            "Configuration error: ttl_secs must not be negative (got -1)"
        );
    }

    #[test]
    fn test_unknown_strategy_message() {
        let err = AssessorError::UnknownStrategy("oracle".to_string());
        assert!(err.to_string().contains("oracle"));
    }
}
