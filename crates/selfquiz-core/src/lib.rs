//! selfquiz-core: answer evaluation engine, question bank, and session state.
//!
//! This crate defines the question/result data model, the heuristic grading
//! engine, and the in-memory state a quiz front end keeps between submissions.

pub mod bank;
pub mod error;
pub mod evaluator;
pub mod feedback;
pub mod model;
pub mod report;
pub mod session;

pub use error::EvaluationError;
pub use evaluator::{evaluate, Evaluator, ScoringWeights};
pub use model::{EvaluationResult, Question, ScoreBreakdown, Subject};
