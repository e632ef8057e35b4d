//! Renderable summaries of a graded submission.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{EvaluationResult, Question, Subject};
use crate::session::Verdict;

/// A graded answer together with the question details needed to display it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionReport {
    pub question_id: String,
    pub subject: Subject,
    pub topic: String,
    pub marks: u32,
    pub verdict: Verdict,
    pub result: EvaluationResult,
}

impl SubmissionReport {
    pub fn new(question: &Question, result: EvaluationResult) -> Self {
        Self {
            question_id: question.id.clone(),
            subject: question.subject,
            topic: question.topic.clone(),
            marks: question.marks,
            verdict: Verdict::from_percentage(result.percentage),
            result,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize submission report")
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let r = &self.result;
        let mut md = String::new();

        md.push_str(&format!(
            "## {} ({}: {})\n\n",
            self.question_id, self.subject, self.topic
        ));
        md.push_str(&format!(
            "**Score:** {}/{} ({}%) - {} {}\n\n",
            r.score,
            self.marks,
            r.percentage,
            self.verdict.title(),
            self.verdict.description()
        ));
        md.push_str(&format!("{}\n\n", r.feedback));

        md.push_str("### Concepts covered\n\n");
        push_keyword_list(&mut md, &r.matched_keywords, "No key concepts identified");
        md.push_str("\n### Concepts missing\n\n");
        push_keyword_list(&mut md, &r.missing_keywords, "All key concepts covered!");

        md.push_str("\n### Breakdown\n\n");
        md.push_str("| Signal | Value |\n");
        md.push_str("|--------|-------|\n");
        md.push_str(&format!(
            "| Keyword coverage | {:.1}% |\n",
            r.breakdown.keyword_ratio * 100.0
        ));
        md.push_str(&format!(
            "| Similarity to ideal answer | {:.1}% |\n",
            r.breakdown.semantic_score * 100.0
        ));
        md.push_str(&format!(
            "| Explanation bonus | {:.3} |\n",
            r.breakdown.explanation_bonus
        ));
        md.push_str(&format!(
            "| Example bonus | {:.3} |\n",
            r.breakdown.example_bonus
        ));

        md
    }
}

fn push_keyword_list(md: &mut String, keywords: &[String], empty: &str) {
    if keywords.is_empty() {
        md.push_str(&format!("_{empty}_\n"));
    } else {
        for keyword in keywords {
            md.push_str(&format!("- {keyword}\n"));
        }
    }
}
