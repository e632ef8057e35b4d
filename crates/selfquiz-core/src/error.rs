//! Evaluation error types.
//!
//! Answer text never produces an error. These variants describe broken
//! question data or a broken weight configuration, both of which are bugs
//! upstream of the engine.

use thiserror::Error;

/// Errors that can occur when evaluating an answer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// The question has no keywords, so coverage is undefined.
    #[error("question '{question_id}' has no keywords")]
    NoKeywords { question_id: String },

    /// The question is worth zero marks, so the percentage is undefined.
    #[error("question '{question_id}' is worth zero marks")]
    ZeroMarks { question_id: String },

    /// Scoring weights do not sum to 1.0.
    #[error("scoring weights must sum to 1.0, got {sum}")]
    InvalidWeights { sum: f64 },

    /// A scoring weight is negative or not finite.
    #[error("scoring weight '{name}' must be a non-negative number, got {value}")]
    NegativeWeight { name: &'static str, value: f64 },
}

impl EvaluationError {
    /// Returns `true` if the error comes from the question record itself
    /// rather than from engine configuration.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            EvaluationError::NoKeywords { .. } | EvaluationError::ZeroMarks { .. }
        )
    }
}
