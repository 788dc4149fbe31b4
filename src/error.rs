//! Error types shared by the engines and the command layer.

use thiserror::Error;

/// Errors raised while parsing, validating, or running engine configuration.
///
/// Rules never surface these directly: they are folded into
/// [`crate::selection::RuleResult`] so a failing rule leaves the caller's
/// selection untouched.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EngineError {
    /// Input was not valid JSON
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Parsed JSON violated the config schema; one message per offending field
    #[error("Schema validation failed: {}", .0.join("; "))]
    Schema(Vec<String>),

    /// A value could not be serialized
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// A regex pattern failed to compile
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A serialized rule carried a config that does not fit its type
    #[error("Invalid config for rule {rule_id}: {message}")]
    InvalidRuleConfig { rule_id: String, message: String },
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_eof() {
            EngineError::InvalidJson(err.to_string())
        } else {
            EngineError::Serialization(err.to_string())
        }
    }
}

impl From<EngineError> for String {
    fn from(err: EngineError) -> Self {
        err.to_string()
    }
}
