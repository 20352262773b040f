use drill_core::Clock;
use drill_core::model::{AnsweredQuestion, Feedback, Question, SessionSettings};
use serde::Serialize;

use super::service::SessionService;
use super::view::SessionResult;
use crate::error::SessionError;

/// What the presentation layer should do after an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum NextAction {
    NextQuestion(Question),
    LevelUp { level: u32, question: Question },
    SessionComplete,
}

impl NextAction {
    /// The question to show next, if the session continues.
    #[must_use]
    pub fn question(&self) -> Option<&Question> {
        match self {
            NextAction::NextQuestion(question) | NextAction::LevelUp { question, .. } => {
                Some(question)
            }
            NextAction::SessionComplete => None,
        }
    }
}

/// Result of answering a single question in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionAnswerResult {
    pub answered: AnsweredQuestion,
    pub feedback: Feedback,
    pub next: NextAction,
}

/// Input events a presentation layer sends to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Start,
    SubmitAnswer(String),
    Restart,
    End,
}

/// Outcome of handling a `SessionEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SessionResponse {
    Question(Question),
    Answered(SessionAnswerResult),
    Ended(SessionResult),
}

/// Creates sessions and routes presentation events into them.
#[derive(Debug, Clone)]
pub struct SessionLoopService {
    clock: Clock,
    settings: SessionSettings,
    seed: Option<u64>,
}

impl SessionLoopService {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            settings: SessionSettings::default(),
            seed: None,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Fix the question sequence, e.g. for tests or shared practice runs.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Build an idle session; send `SessionEvent::Start` to begin.
    #[must_use]
    pub fn create_session(&self) -> SessionService {
        match self.seed {
            Some(seed) => SessionService::seeded(self.settings, self.clock, seed),
            None => SessionService::new(self.settings, self.clock),
        }
    }

    /// Apply one event to `session`.
    ///
    /// # Errors
    ///
    /// Propagates `SessionError` from the session; invalid answers are
    /// recoverable and leave the session untouched.
    pub fn dispatch(
        &self,
        session: &mut SessionService,
        event: SessionEvent,
    ) -> Result<SessionResponse, SessionError> {
        match event {
            SessionEvent::Start => Ok(SessionResponse::Question(session.start_session())),
            SessionEvent::Restart => Ok(SessionResponse::Question(session.restart())),
            SessionEvent::SubmitAnswer(raw) => {
                Ok(SessionResponse::Answered(session.submit_answer(&raw)?))
            }
            SessionEvent::End => Ok(SessionResponse::Ended(session.end_session()?)),
        }
    }
}
