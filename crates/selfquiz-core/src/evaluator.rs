//! Heuristic answer evaluation engine.
//!
//! Grades a free-text answer against a question with four lexical signals:
//! keyword coverage, a word/phrase overlap proxy for semantic similarity,
//! explanation quality, and example usage. There is no language model here;
//! every signal is a substring or token-set comparison, so the same inputs
//! always produce the same result.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::EvaluationError;
use crate::feedback::compose_feedback;
use crate::model::{EvaluationResult, Question, ScoreBreakdown};

/// Upper bound of the semantic proxy. Lexical overlap alone never reports
/// near-perfect similarity.
pub const SEMANTIC_CAP: f64 = 0.95;
/// Upper bound of the raw explanation bonus.
pub const EXPLANATION_CAP: f64 = 0.35;
/// Upper bound of the raw example bonus.
pub const EXAMPLE_CAP: f64 = 0.2;

const EXPLANATION_STEP: f64 = 0.05;
const EXAMPLE_STEP: f64 = 0.08;
const VARIETY_CAP: f64 = 0.1;
const LENGTH_CAP: f64 = 0.1;
const LENGTH_SATURATION_WORDS: f64 = 200.0;

/// Words of this many characters or fewer are ignored by the overlap signals.
const SHORT_WORD_LEN: usize = 3;

/// Discourse markers that indicate reasoning rather than term-dropping.
pub const EXPLANATION_PATTERNS: &[&str] = &[
    "because",
    "therefore",
    "thus",
    "as a result",
    "consequently",
    "this means",
    "this leads to",
    "this results in",
    "this causes",
    "for example",
    "such as",
    "specifically",
    "in particular",
    "defines",
    "refers to",
    "is defined as",
    "can be understood as",
    "consists of",
    "comprises",
    "involves",
];

/// Phrases that introduce an illustrative example.
pub const EXAMPLE_PATTERNS: &[&str] = &[
    "for example",
    "such as",
    "for instance",
    "e.g.",
    "i.e.",
    "to illustrate",
    "consider",
    "let's say",
    "imagine",
    "take the case",
    "in the case of",
];

/// Relative weight of each signal in the combined score.
///
/// Weights must be non-negative and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub keyword: f64,
    pub semantic: f64,
    pub explanation: f64,
    pub example: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            keyword: 0.7,
            semantic: 0.2,
            explanation: 0.07,
            example: 0.03,
        }
    }
}

impl ScoringWeights {
    /// The 0.6/0.2/0.15/0.05 split, which rewards writing style more heavily.
    pub fn style_heavy() -> Self {
        Self {
            keyword: 0.6,
            semantic: 0.2,
            explanation: 0.15,
            example: 0.05,
        }
    }

    /// Check that every weight is a non-negative number and that they sum to 1.0.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        let named = [
            ("keyword", self.keyword),
            ("semantic", self.semantic),
            ("explanation", self.explanation),
            ("example", self.example),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(EvaluationError::NegativeWeight { name, value });
            }
        }

        let sum: f64 = named.iter().map(|(_, v)| v).sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(EvaluationError::InvalidWeights { sum });
        }
        Ok(())
    }
}

/// The answer evaluation engine.
///
/// Holds only its weights, so one instance can grade any number of answers
/// from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    weights: ScoringWeights,
}

impl Evaluator {
    /// Create an evaluator with the default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator with custom weights.
    pub fn with_weights(weights: ScoringWeights) -> Result<Self, EvaluationError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Grade `answer` against `question`.
    ///
    /// Any answer text yields a result. An error means the question itself
    /// is malformed (no keywords or zero marks).
    pub fn evaluate(
        &self,
        question: &Question,
        answer: &str,
    ) -> Result<EvaluationResult, EvaluationError> {
        if question.keywords.is_empty() {
            return Err(EvaluationError::NoKeywords {
                question_id: question.id.clone(),
            });
        }
        if question.marks == 0 {
            return Err(EvaluationError::ZeroMarks {
                question_id: question.id.clone(),
            });
        }

        let answer_lower = answer.to_lowercase();

        let (matched_keywords, missing_keywords): (Vec<String>, Vec<String>) = question
            .keywords
            .iter()
            .cloned()
            .partition(|keyword| answer_lower.contains(&keyword.to_lowercase()));
        let keyword_ratio = matched_keywords.len() as f64 / question.keywords.len() as f64;

        let semantic_score = semantic_similarity(&answer_lower, &question.ideal_answer);
        let explanation_bonus = explanation_quality(&answer_lower);
        let example_bonus = example_usage(&answer_lower);

        let w = &self.weights;
        let combined = keyword_ratio * w.keyword
            + semantic_score * w.semantic
            + (explanation_bonus / EXPLANATION_CAP) * w.explanation
            + (example_bonus / EXAMPLE_CAP) * w.example;

        let marks = f64::from(question.marks);
        let score = round_to_tenth((combined * marks).clamp(0.0, marks));
        let percentage = (100.0 * score / marks).round().clamp(0.0, 100.0) as u8;

        tracing::debug!(
            question = %question.id,
            keyword_ratio,
            semantic_score,
            explanation_bonus,
            example_bonus,
            score,
            percentage,
            "evaluated answer"
        );

        let feedback = compose_feedback(
            percentage,
            &missing_keywords,
            explanation_bonus,
            example_bonus,
        );

        Ok(EvaluationResult {
            score,
            percentage,
            matched_keywords,
            missing_keywords,
            feedback,
            breakdown: ScoreBreakdown {
                keyword_ratio,
                semantic_score,
                explanation_bonus,
                example_bonus,
            },
        })
    }
}

/// Grade `answer` against `question` with the default weights.
pub fn evaluate(question: &Question, answer: &str) -> Result<EvaluationResult, EvaluationError> {
    Evaluator::default().evaluate(question, answer)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(str::to_lowercase)
}

fn is_substantive(word: &str) -> bool {
    word.chars().count() > SHORT_WORD_LEN
}

/// Lexical stand-in for semantic similarity, in `[0, SEMANTIC_CAP]`.
pub fn semantic_similarity(answer: &str, ideal_answer: &str) -> f64 {
    let combined =
        0.5 * word_similarity(answer, ideal_answer) + 0.5 * phrase_similarity(answer, ideal_answer);
    combined.min(SEMANTIC_CAP)
}

/// Share of the ideal answer's distinct substantive words that the answer uses.
pub fn word_similarity(answer: &str, ideal_answer: &str) -> f64 {
    let ideal_words: HashSet<String> = tokenize(ideal_answer)
        .filter(|w| is_substantive(w))
        .collect();
    if ideal_words.is_empty() {
        return 0.0;
    }

    let answer_words: HashSet<String> = tokenize(answer).collect();
    let common = ideal_words
        .iter()
        .filter(|w| answer_words.contains(*w))
        .count();
    common as f64 / ideal_words.len() as f64
}

/// Share of the ideal answer's key phrases that appear in the answer.
pub fn phrase_similarity(answer: &str, ideal_answer: &str) -> f64 {
    let phrases = key_phrases(ideal_answer);
    if phrases.is_empty() {
        return 0.0;
    }

    let answer_lower = answer.to_lowercase();
    let matched = phrases
        .iter()
        .filter(|p| answer_lower.contains(p.as_str()))
        .count();
    matched as f64 / phrases.len() as f64
}

/// Two- and three-word windows of `text` made only of substantive words.
///
/// Phrases are lowercased and deduplicated, keeping first-seen order with all
/// two-word phrases before three-word phrases.
pub fn key_phrases(text: &str) -> Vec<String> {
    let words: Vec<String> = tokenize(text).collect();
    let mut seen = HashSet::new();
    let mut phrases = Vec::new();

    for size in [2, 3] {
        for window in words.windows(size) {
            if window.iter().all(|w| is_substantive(w)) {
                let phrase = window.join(" ");
                if seen.insert(phrase.clone()) {
                    phrases.push(phrase);
                }
            }
        }
    }

    phrases
}

/// Raw explanation bonus in `[0, EXPLANATION_CAP]`.
///
/// Sums 0.05 per explanatory connective present, up to 0.1 for varied
/// sentence openers, and up to 0.1 for length (saturating at 200 words).
pub fn explanation_quality(answer: &str) -> f64 {
    let answer_lower = answer.to_lowercase();

    let connectives = EXPLANATION_PATTERNS
        .iter()
        .filter(|p| answer_lower.contains(*p))
        .count() as f64
        * EXPLANATION_STEP;

    let variety = sentence_variety(&answer_lower) * VARIETY_CAP;

    let word_count = answer_lower.split_whitespace().count() as f64;
    let length = LENGTH_CAP * (word_count / LENGTH_SATURATION_WORDS).min(1.0);

    (connectives + variety + length).min(EXPLANATION_CAP)
}

/// Distinct sentence openers divided by sentence count, in `[0, 1]`.
///
/// Sentences are split on `.`, `!` and `?`; blank fragments are dropped.
pub fn sentence_variety(text: &str) -> f64 {
    let openers: Vec<String> = text
        .split(|c| matches!(c, '.' | '!' | '?'))
        .filter_map(|sentence| sentence.split_whitespace().next())
        .map(str::to_lowercase)
        .collect();
    if openers.is_empty() {
        return 0.0;
    }

    let distinct: HashSet<&String> = openers.iter().collect();
    distinct.len() as f64 / openers.len() as f64
}

/// Raw example bonus in `[0, EXAMPLE_CAP]`, 0.08 per example phrase present.
pub fn example_usage(answer: &str) -> f64 {
    let answer_lower = answer.to_lowercase();
    let hits = EXAMPLE_PATTERNS
        .iter()
        .filter(|p| answer_lower.contains(*p))
        .count() as f64;
    (hits * EXAMPLE_STEP).min(EXAMPLE_CAP)
}
