//! Core data model types for selfquiz.
//!
//! Questions come from a question bank and are never mutated after load.
//! Evaluation results are produced fresh for every submission.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A topic domain that questions are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Os,
    Cn,
    Dsa,
}

impl Subject {
    /// Every known subject, in menu order.
    pub const ALL: [Subject; 3] = [Subject::Os, Subject::Cn, Subject::Dsa];

    /// Short code shown in menus (e.g. "OS").
    pub fn code(&self) -> &'static str {
        match self {
            Subject::Os => "OS",
            Subject::Cn => "CN",
            Subject::Dsa => "DSA",
        }
    }

    /// Full human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Subject::Os => "Operating Systems",
            Subject::Cn => "Computer Networks",
            Subject::Dsa => "Data Structures & Algorithms",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "os" | "operating-systems" | "operating systems" => Ok(Subject::Os),
            "cn" | "networks" | "computer-networks" | "computer networks" => Ok(Subject::Cn),
            "dsa" | "algorithms" | "data-structures" | "data structures & algorithms" => {
                Ok(Subject::Dsa)
            }
            other => Err(format!("unknown subject: {other}")),
        }
    }
}

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier (e.g. "os-1").
    pub id: String,
    /// Subject this question belongs to.
    pub subject: Subject,
    /// Free-text topic label.
    pub topic: String,
    /// The question shown to the learner.
    pub prompt: String,
    /// Reference answer used for similarity scoring.
    pub ideal_answer: String,
    /// Required concepts, matched case-insensitively as substrings.
    pub keywords: Vec<String>,
    /// Maximum achievable score.
    pub marks: u32,
}

/// The outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Score out of the question's marks, rounded to one decimal place.
    pub score: f64,
    /// `round(100 * score / marks)`, in `0..=100`.
    pub percentage: u8,
    /// Keywords found in the answer, in question order.
    pub matched_keywords: Vec<String>,
    /// Keywords not found in the answer, in question order.
    pub missing_keywords: Vec<String>,
    /// Natural-language feedback.
    pub feedback: String,
    /// Where the points came from.
    pub breakdown: ScoreBreakdown,
}

/// Per-signal values behind a score.
///
/// `keyword_ratio` and `semantic_score` are already in `[0, 1]`. The two
/// bonuses are kept in their raw ranges (`[0, 0.35]` and `[0, 0.2]`) because
/// feedback thresholds are expressed on the raw values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub keyword_ratio: f64,
    pub semantic_score: f64,
    pub explanation_bonus: f64,
    pub example_bonus: f64,
}
