use chrono::{DateTime, Utc};
use serde::Serialize;

use drill_core::WeaknessReport;
use drill_core::model::{AnsweredQuestion, SessionState};
use drill_core::time::rounded_seconds;

/// Final numbers shown on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionResult {
    pub final_score: u32,
    pub accuracy_percent: u32,
    pub elapsed_seconds: u64,
    pub total_answered: usize,
    pub correct_answers: usize,
}

impl SessionResult {
    pub(crate) fn from_state(
        state: &SessionState,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Self {
        let total_answered = state.history().len();
        let correct_answers = state.correct_count();
        Self {
            final_score: state.score(),
            accuracy_percent: accuracy_percent(correct_answers, total_answered),
            elapsed_seconds: rounded_seconds(started_at, ended_at),
            total_answered,
            correct_answers,
        }
    }
}

/// `round(100 * correct / total)`, half rounding up. Zero when nothing was answered.
fn accuracy_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let pct = (200 * correct + total) / (2 * total);
    u32::try_from(pct).unwrap_or(100)
}

/// One wrong answer as shown on the review screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    pub question_text: String,
    pub user_answer: i64,
    pub correct_answer: u32,
    pub level: u32,
}

impl From<&AnsweredQuestion> for ReviewItem {
    fn from(answered: &AnsweredQuestion) -> Self {
        Self {
            question_text: answered.question.display_text().to_string(),
            user_answer: answered.user_answer,
            correct_answer: answered.question.correct_answer(),
            level: answered.level,
        }
    }
}

/// Everything the end-of-session screens need, in one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub result: SessionResult,
    pub weaknesses: WeaknessReport,
    pub review: Vec<ReviewItem>,
}
