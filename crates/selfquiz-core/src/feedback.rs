//! Feedback text generation.
//!
//! A fixed ladder of base sentences keyed on the percentage, followed by
//! advisory clauses. Nothing here feeds back into the score.

/// Raw explanation bonus below which structural advice is given.
pub const EXPLANATION_ADVICE_THRESHOLD: f64 = 0.15;
/// Raw example bonus below which example advice is given.
pub const EXAMPLE_ADVICE_THRESHOLD: f64 = 0.05;
/// Number of missing keywords named before "and others".
pub const MAX_NAMED_MISSING: usize = 3;

/// Performance band of a graded answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackBand {
    Excellent,
    Great,
    Good,
    Satisfactory,
    NeedsImprovement,
}

impl FeedbackBand {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            90..=u8::MAX => FeedbackBand::Excellent,
            75..=89 => FeedbackBand::Great,
            60..=74 => FeedbackBand::Good,
            40..=59 => FeedbackBand::Satisfactory,
            _ => FeedbackBand::NeedsImprovement,
        }
    }

    pub fn sentence(&self) -> &'static str {
        match self {
            FeedbackBand::Excellent => "Excellent answer! You've covered all the important concepts and provided clear explanations.",
            FeedbackBand::Great => "Great answer! You've covered most of the important concepts with good explanations.",
            FeedbackBand::Good => "Good answer, but you could improve by explaining some concepts more thoroughly.",
            FeedbackBand::Satisfactory => "Satisfactory answer, but you missed some important concepts. Try to be more comprehensive.",
            FeedbackBand::NeedsImprovement => "Your answer needs improvement. Consider covering the key concepts and explaining them better.",
        }
    }
}

/// Build the feedback string for a graded answer.
///
/// Clause order is fixed: base sentence, missing concepts, explanation
/// style, examples.
pub fn compose_feedback(
    percentage: u8,
    missing_keywords: &[String],
    explanation_bonus: f64,
    example_bonus: f64,
) -> String {
    let mut parts = vec![FeedbackBand::from_percentage(percentage)
        .sentence()
        .to_string()];

    if let Some(clause) = missing_concepts_clause(missing_keywords) {
        parts.push(clause);
    }

    if (40..75).contains(&percentage) && explanation_bonus < EXPLANATION_ADVICE_THRESHOLD {
        parts.push(
            "Try to define key terms and explain how the concepts relate to each other."
                .to_string(),
        );
    }

    if example_bonus < EXAMPLE_ADVICE_THRESHOLD && percentage < 90 {
        parts.push("Consider adding concrete examples to illustrate your points.".to_string());
    }

    parts.join(" ")
}

fn missing_concepts_clause(missing: &[String]) -> Option<String> {
    if missing.is_empty() {
        return None;
    }

    let named = missing
        .iter()
        .take(MAX_NAMED_MISSING)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let terms = if missing.len() > MAX_NAMED_MISSING {
        format!("{named}, and others")
    } else {
        named
    };
    Some(format!("Focus on including concepts like: {terms}."))
}
