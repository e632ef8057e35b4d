//! In-memory quiz session state.
//!
//! Everything here lives only as long as the session: a running count and
//! average, the last question shown, and the learner-facing verdict for a
//! graded answer. Nothing is written to disk.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{EvaluationResult, Question};

/// Running totals across the answers submitted in one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Number of graded answers.
    pub answered: u32,
    /// Sum of the percentages of every graded answer.
    pub total_percentage: u64,
}

impl SessionStats {
    pub fn record(&mut self, result: &EvaluationResult) {
        self.answered += 1;
        self.total_percentage += u64::from(result.percentage);
    }

    /// Mean percentage so far, or `None` before the first answer.
    pub fn average_percentage(&self) -> Option<f64> {
        if self.answered == 0 {
            None
        } else {
            Some(self.total_percentage as f64 / f64::from(self.answered))
        }
    }
}

/// Random question selection that avoids showing the same question twice
/// in a row.
#[derive(Debug, Clone, Default)]
pub struct QuestionPicker {
    last_id: Option<String>,
}

impl QuestionPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick a question from `candidates`.
    ///
    /// When more than one candidate exists the previously picked question is
    /// excluded. Returns `None` only for an empty slice.
    pub fn pick<'a, R: Rng + ?Sized>(
        &mut self,
        candidates: &[&'a Question],
        rng: &mut R,
    ) -> Option<&'a Question> {
        if candidates.is_empty() {
            return None;
        }

        let eligible: Vec<&'a Question> = if candidates.len() > 1 {
            candidates
                .iter()
                .copied()
                .filter(|q| self.last_id.as_deref() != Some(q.id.as_str()))
                .collect()
        } else {
            candidates.to_vec()
        };
        // The previous question may belong to another subject.
        let pool = if eligible.is_empty() {
            candidates.to_vec()
        } else {
            eligible
        };

        let chosen = pool[rng.random_range(0..pool.len())];
        self.last_id = Some(chosen.id.clone());
        Some(chosen)
    }

    /// Id of the most recently picked question.
    pub fn last_picked(&self) -> Option<&str> {
        self.last_id.as_deref()
    }

    /// Forget the previous pick, e.g. after switching subjects.
    pub fn reset(&mut self) {
        self.last_id = None;
    }
}

/// Short learner-facing verdict shown after grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Mastered,
    OnTrack,
    KeepLearning,
}

impl Verdict {
    pub fn from_percentage(percentage: u8) -> Self {
        if percentage >= 80 {
            Verdict::Mastered
        } else if percentage >= 50 {
            Verdict::OnTrack
        } else {
            Verdict::KeepLearning
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Verdict::Mastered => "Excellent!",
            Verdict::OnTrack => "Good effort!",
            Verdict::KeepLearning => "Keep learning!",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Verdict::Mastered => "You've mastered this concept.",
            Verdict::OnTrack => "You're on the right track.",
            Verdict::KeepLearning => "Focus on the missing concepts.",
        }
    }

    /// Whether the verdict should be rendered as a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self, Verdict::KeepLearning)
    }
}

/// One learner's quiz session.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub stats: SessionStats,
    pub picker: QuestionPicker,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            stats: SessionStats::default(),
            picker: QuestionPicker::new(),
        }
    }

    /// Record a graded answer and return the verdict to show for it.
    pub fn record(&mut self, result: &EvaluationResult) -> Verdict {
        self.stats.record(result);
        tracing::debug!(
            session = %self.id,
            answered = self.stats.answered,
            "recorded answer at {}%",
            result.percentage
        );
        Verdict::from_percentage(result.percentage)
    }

    /// Wall-clock time since the session started.
    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ScoreBreakdown, Subject};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn result_at(percentage: u8) -> EvaluationResult {
        EvaluationResult {
            score: f64::from(percentage) / 10.0,
            percentage,
            matched_keywords: vec![],
            missing_keywords: vec![],
            feedback: String::new(),
            breakdown: ScoreBreakdown {
                keyword_ratio: 0.0,
                semantic_score: 0.0,
                explanation_bonus: 0.0,
                example_bonus: 0.0,
            },
        }
    }

    fn question(id: &str) -> Question {
        Question {
            id: id.into(),
            subject: Subject::Dsa,
            topic: String::new(),
            prompt: format!("prompt {id}"),
            ideal_answer: String::new(),
            keywords: vec!["k".into()],
            marks: 10,
        }
    }

    #[test]
    fn stats_running_average() {
        let mut stats = SessionStats::default();
        assert_eq!(stats.average_percentage(), None);

        stats.record(&result_at(40));
        stats.record(&result_at(91));
        assert_eq!(stats.answered, 2);
        assert_eq!(stats.average_percentage(), Some(65.5));
    }

    #[test]
    fn picker_never_repeats_previous_question() {
        let questions: Vec<Question> = ["a", "b", "c"].iter().map(|id| question(id)).collect();
        let refs: Vec<&Question> = questions.iter().collect();
        let mut picker = QuestionPicker::new();
        let mut rng = StdRng::seed_from_u64(7);

        let mut previous = picker.pick(&refs, &mut rng).unwrap().id.clone();
        for _ in 0..200 {
            let next = picker.pick(&refs, &mut rng).unwrap();
            assert_ne!(next.id, previous);
            previous = next.id.clone();
        }
        assert_eq!(picker.last_picked(), Some(previous.as_str()));
    }

    #[test]
    fn picker_repeats_single_candidate() {
        let only = question("solo");
        let refs = vec![&only];
        let mut picker = QuestionPicker::new();
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(picker.pick(&refs, &mut rng).unwrap().id, "solo");
        assert_eq!(picker.pick(&refs, &mut rng).unwrap().id, "solo");
    }

    #[test]
    fn picker_handles_empty_and_reset() {
        let mut picker = QuestionPicker::new();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(picker.pick(&[], &mut rng).is_none());

        let q = question("x");
        picker.pick(&[&q], &mut rng);
        picker.reset();
        assert_eq!(picker.last_picked(), None);
    }

    #[test]
    fn verdict_thresholds() {
        assert_eq!(Verdict::from_percentage(100), Verdict::Mastered);
        assert_eq!(Verdict::from_percentage(80), Verdict::Mastered);
        assert_eq!(Verdict::from_percentage(79), Verdict::OnTrack);
        assert_eq!(Verdict::from_percentage(50), Verdict::OnTrack);
        assert_eq!(Verdict::from_percentage(49), Verdict::KeepLearning);
        assert!(Verdict::KeepLearning.is_warning());
        assert_eq!(Verdict::Mastered.title(), "Excellent!");
    }

    #[test]
    fn session_records_and_returns_verdict() {
        let mut session = Session::new();
        assert_eq!(session.record(&result_at(85)), Verdict::Mastered);
        assert_eq!(session.record(&result_at(20)), Verdict::KeepLearning);
        assert_eq!(session.stats.answered, 2);
        assert!(session.elapsed() >= chrono::Duration::zero());
    }
}
