//! Plain-text rendering for the terminal.

use std::fmt::Write;

use selfquiz_core::session::{SessionStats, Verdict};
use selfquiz_core::{EvaluationResult, Question, Subject};

/// Notice shown when grading fails for any reason.
pub const EVALUATION_FAILED: &str = "There was a problem evaluating your answer.";

/// Notice shown when an empty answer is submitted.
pub const EMPTY_ANSWER: &str = "Please enter an answer before submitting.";

pub fn subject_menu(available: &[Subject]) -> String {
    let mut out = String::from("Choose a subject:\n");
    for (i, subject) in available.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {:<4} {}",
            i + 1,
            subject.code().to_lowercase(),
            subject.name()
        );
    }
    out
}

pub fn question(question: &Question) -> String {
    format!(
        "\n[{}] {} ({} marks)\n{}\n",
        question.subject,
        question.topic,
        question.marks,
        question.prompt.trim()
    )
}

/// Render a graded answer: score line, verdict, feedback and concept lists.
pub fn result(question: &Question, result: &EvaluationResult, show_breakdown: bool) -> String {
    let verdict = Verdict::from_percentage(result.percentage);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\nScore: {}/{} ({}%)",
        result.score, question.marks, result.percentage
    );
    let marker = if verdict.is_warning() { "!" } else { "*" };
    let _ = writeln!(
        out,
        "{marker} {} {}",
        verdict.title(),
        verdict.description()
    );
    let _ = writeln!(out, "\n{}", result.feedback);

    out.push_str("\nConcepts covered:\n");
    push_list(&mut out, &result.matched_keywords, "No key concepts identified");
    out.push_str("Concepts missing:\n");
    push_list(&mut out, &result.missing_keywords, "All key concepts covered!");

    if show_breakdown {
        let b = &result.breakdown;
        let _ = writeln!(
            out,
            "Breakdown: keywords {:.0}% | similarity {:.0}% | explanation {:.3} | examples {:.3}",
            b.keyword_ratio * 100.0,
            b.semantic_score * 100.0,
            b.explanation_bonus,
            b.example_bonus
        );
    }

    out
}

fn push_list(out: &mut String, items: &[String], empty: &str) {
    if items.is_empty() {
        let _ = writeln!(out, "  {empty}");
    } else {
        for item in items {
            let _ = writeln!(out, "  - {item}");
        }
    }
}

pub fn stats(stats: &SessionStats) -> String {
    match stats.average_percentage() {
        Some(avg) => format!("Answered: {} | Average: {:.1}%", stats.answered, avg),
        None => "Answered: 0 | Average: -".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selfquiz_core::evaluate;

    fn q() -> Question {
        Question {
            id: "os-9".into(),
            subject: Subject::Os,
            topic: "Paging".into(),
            prompt: "What is paging?".into(),
            ideal_answer: "Paging splits memory into fixed-size pages and frames.".into(),
            keywords: vec!["pages".into(), "frames".into()],
            marks: 10,
        }
    }

    #[test]
    fn renders_menu_with_codes() {
        let menu = subject_menu(&Subject::ALL);
        assert!(menu.contains("1. os   Operating Systems"));
        assert!(menu.contains("3. dsa  Data Structures & Algorithms"));
    }

    #[test]
    fn renders_question_header() {
        let text = question(&q());
        assert!(text.contains("[OS] Paging (10 marks)"));
        assert!(text.contains("What is paging?"));
    }

    #[test]
    fn renders_result_lists() {
        let question = q();
        let graded = evaluate(&question, "memory is cut into pages").unwrap();
        let text = result(&question, &graded, false);

        assert!(text.contains("Concepts covered:\n  - pages\n"));
        assert!(text.contains("Concepts missing:\n  - frames\n"));
        assert!(!text.contains("Breakdown:"));
        assert!(result(&question, &graded, true).contains("Breakdown:"));
    }

    #[test]
    fn renders_stats_line() {
        let mut s = SessionStats::default();
        assert_eq!(stats(&s), "Answered: 0 | Average: -");
        s.answered = 2;
        s.total_percentage = 131;
        assert_eq!(stats(&s), "Answered: 2 | Average: 65.5%");
    }
}
