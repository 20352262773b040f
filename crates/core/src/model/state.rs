use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::answer::AnsweredQuestion;
use crate::model::settings::SessionSettings;
use crate::model::used::UsedQuestions;

/// Read-only view of the counters a UI shows during play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub level: u32,
    pub question_index: u32,
    pub score: u32,
}

/// Where the session goes after an answer has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progression {
    SameLevel,
    LevelUp { level: u32 },
    Finished,
}

/// Mutable state of one drill session.
///
/// `history` and `wrong_answers` are append-only; `reset` is the only way to
/// discard them.
#[derive(Debug, Clone)]
pub struct SessionState {
    level: u32,
    question_index: u32,
    score: u32,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    history: Vec<AnsweredQuestion>,
    wrong_answers: Vec<AnsweredQuestion>,
    used: UsedQuestions,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            level: 1,
            question_index: 0,
            score: 0,
            started_at: None,
            ended_at: None,
            history: Vec::new(),
            wrong_answers: Vec::new(),
            used: UsedQuestions::new(),
        }
    }
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to level 1 with empty history, score, timestamps and used set.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Resets and stamps the start time.
    pub fn begin(&mut self, started_at: DateTime<Utc>) {
        self.reset();
        self.started_at = Some(started_at);
    }

    /// Marks the next question of the current level as asked.
    pub fn begin_question(&mut self) {
        self.question_index += 1;
    }

    /// Appends an answer to the history and awards points when correct.
    pub fn record(&mut self, answered: AnsweredQuestion, points_per_correct: u32) {
        if answered.is_correct {
            self.score = self.score.saturating_add(points_per_correct);
        } else {
            self.wrong_answers.push(answered.clone());
        }
        self.history.push(answered);
    }

    /// Moves the level/question counters forward after an answer.
    ///
    /// Does not count the next question; `begin_question` does that once it is
    /// generated.
    pub fn advance(&mut self, settings: &SessionSettings) -> Progression {
        if self.question_index < settings.questions_per_level() {
            Progression::SameLevel
        } else if self.level < settings.level_count() {
            self.level += 1;
            self.question_index = 0;
            Progression::LevelUp { level: self.level }
        } else {
            Progression::Finished
        }
    }

    /// Stamps the end time once; later calls keep the first stamp.
    pub fn finish(&mut self, ended_at: DateTime<Utc>) {
        if self.ended_at.is_none() {
            self.ended_at = Some(ended_at);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            level: self.level,
            question_index: self.question_index,
            score: self.score,
        }
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn question_index(&self) -> u32 {
        self.question_index
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.ended_at.is_some()
    }

    #[must_use]
    pub fn history(&self) -> &[AnsweredQuestion] {
        &self.history
    }

    #[must_use]
    pub fn wrong_answers(&self) -> &[AnsweredQuestion] {
        &self.wrong_answers
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.history.iter().filter(|a| a.is_correct).count()
    }

    #[must_use]
    pub fn used(&self) -> &UsedQuestions {
        &self.used
    }

    pub fn used_mut(&mut self) -> &mut UsedQuestions {
        &mut self.used
    }
}
