use thiserror::Error;

use crate::score::Scheme;
use crate::scoring::Algorithm;

/// Errors raised when a `Score` or a scoring configuration breaks the rules
/// the ranking machinery depends on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("invalid score: {0}")]
    InvalidScore(String),

    #[error("invalid score at index {index}: {reason}")]
    InvalidScoreAt { index: usize, reason: String },

    #[error("scheme mismatch: expected {expected}, found {found} at index {index}")]
    SchemeMismatch {
        expected: Scheme,
        found: Scheme,
        index: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("algorithm '{algorithm}' requires '{field}' to be configured")]
    MissingSubConfig {
        algorithm: Algorithm,
        field: &'static str,
    },

    #[error("invalid position {0}: positions start at 1")]
    InvalidPosition(u32),

    #[error("algorithm '{0}' is not table driven; point overrides are not supported")]
    NotTableDriven(Algorithm),

    #[error("head_to_head_event_id is required for head_to_head tiebreaker")]
    MissingHeadToHeadEvent,
}

pub type Result<T> = std::result::Result<T, ScoringError>;

/// Raw input that cannot be encoded under the requested scheme.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
