use std::fmt;

use drill_core::model::{
    AnsweredQuestion, Progression, Question, SessionSettings, SessionSnapshot, SessionState,
    evaluate,
};
use drill_core::{Clock, QuestionGenerator, WeaknessReport, analyze_weakness};
use tracing::{debug, info, warn};

use super::progress::SessionProgress;
use super::view::{ReviewItem, SessionReport, SessionResult};
use super::workflow::{NextAction, SessionAnswerResult};
use crate::error::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Ended,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory drill session.
///
/// Owns the session state, including the used-question set it lends to the
/// generator. Answers advance the session immediately; any feedback pause is
/// up to the caller.
pub struct SessionService {
    settings: SessionSettings,
    clock: Clock,
    generator: QuestionGenerator,
    state: SessionState,
    phase: Phase,
    current: Option<Question>,
}

impl SessionService {
    /// Create an idle session drawing questions from OS entropy.
    #[must_use]
    pub fn new(settings: SessionSettings, clock: Clock) -> Self {
        Self::with_generator(settings, clock, QuestionGenerator::from_entropy())
    }

    /// Create an idle session with a reproducible question sequence.
    #[must_use]
    pub fn seeded(settings: SessionSettings, clock: Clock, seed: u64) -> Self {
        Self::with_generator(settings, clock, QuestionGenerator::seeded(seed))
    }

    fn with_generator(settings: SessionSettings, clock: Clock, generator: QuestionGenerator) -> Self {
        Self {
            settings,
            clock,
            generator,
            state: SessionState::new(),
            phase: Phase::Idle,
            current: None,
        }
    }

    /// Start (or restart) the session and return the first question.
    ///
    /// All previous state is discarded, including the used-question set.
    pub fn start_session(&mut self) -> Question {
        let now = self.clock.now();
        self.state.begin(now);
        self.phase = Phase::Running;
        info!(started_at = %now, "drill session started");
        self.next_question()
    }

    /// Same as `start_session`; kept for callers that model a restart button.
    pub fn restart(&mut self) -> Question {
        self.start_session()
    }

    fn next_question(&mut self) -> Question {
        self.state.begin_question();
        let level = self.state.level();
        let question = match self.generator.generate(level, self.state.used_mut()) {
            Ok(question) => question,
            Err(err) => {
                warn!(%err, "reusing a question");
                err.into_fallback()
            }
        };
        debug!(
            level,
            index = self.state.question_index(),
            question = %question,
            "question generated"
        );
        self.current = Some(question.clone());
        question
    }

    /// Grade `raw` against the current question and move the session forward.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `start_session`,
    /// `SessionError::Completed` once the session has ended, and
    /// `SessionError::Answer` if `raw` is not a number. None of these change
    /// any state.
    pub fn submit_answer(&mut self, raw: &str) -> Result<SessionAnswerResult, SessionError> {
        match self.phase {
            Phase::Idle => return Err(SessionError::NotStarted),
            Phase::Ended => return Err(SessionError::Completed),
            Phase::Running => {}
        }
        let question = self.current.as_ref().ok_or(SessionError::NotStarted)?;
        let answered = evaluate(raw, question, self.state.level())?;
        debug!(
            question = %answered.question,
            user_answer = answered.user_answer,
            correct = answered.is_correct,
            "answer recorded"
        );

        let feedback = answered.feedback();
        self.state
            .record(answered.clone(), self.settings.points_per_correct());

        let next = match self.state.advance(&self.settings) {
            Progression::SameLevel => NextAction::NextQuestion(self.next_question()),
            Progression::LevelUp { level } => {
                info!(level, score = self.state.score(), "level up");
                NextAction::LevelUp {
                    level,
                    question: self.next_question(),
                }
            }
            Progression::Finished => {
                self.finish();
                NextAction::SessionComplete
            }
        };

        Ok(SessionAnswerResult {
            answered,
            feedback,
            next,
        })
    }

    fn finish(&mut self) {
        if self.phase == Phase::Ended {
            return;
        }
        self.state.finish(self.clock.now());
        self.phase = Phase::Ended;
        self.current = None;
        info!(
            score = self.state.score(),
            answered = self.state.history().len(),
            "drill session finished"
        );
    }

    /// Stop the session (if still running) and compute the final numbers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` if the session was never started.
    pub fn end_session(&mut self) -> Result<SessionResult, SessionError> {
        if self.phase == Phase::Idle {
            return Err(SessionError::NotStarted);
        }
        self.finish();
        self.result()
    }

    /// Final numbers of an ended session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` if the session has not ended yet.
    pub fn result(&self) -> Result<SessionResult, SessionError> {
        let (Some(started_at), Some(ended_at)) = (self.state.started_at(), self.state.ended_at())
        else {
            return Err(SessionError::NotStarted);
        };
        Ok(SessionResult::from_state(&self.state, started_at, ended_at))
    }

    /// Result, weakness analysis and review list of an ended session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` if the session has not ended yet.
    pub fn report(&self) -> Result<SessionReport, SessionError> {
        Ok(SessionReport {
            result: self.result()?,
            weaknesses: self.weakness_report(),
            review: self.review(),
        })
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = usize::try_from(self.settings.total_questions()).unwrap_or(usize::MAX);
        let answered = self.state.history().len();
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.is_complete(),
        }
    }

    /// Recomputed from the wrong answers on every call.
    #[must_use]
    pub fn weakness_report(&self) -> WeaknessReport {
        analyze_weakness(self.state.wrong_answers())
    }

    #[must_use]
    pub fn wrong_answers(&self) -> &[AnsweredQuestion] {
        self.state.wrong_answers()
    }

    #[must_use]
    pub fn history(&self) -> &[AnsweredQuestion] {
        self.state.history()
    }

    #[must_use]
    pub fn review(&self) -> Vec<ReviewItem> {
        self.state.wrong_answers().iter().map(ReviewItem::from).collect()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.phase != Phase::Idle
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Ended
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    #[must_use]
    pub fn used_question_count(&self) -> usize {
        self.state.used().len()
    }

    #[cfg(test)]
    pub(crate) fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("settings", &self.settings)
            .field("phase", &self.phase)
            .field("snapshot", &self.state.snapshot())
            .field("history_len", &self.state.history().len())
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
