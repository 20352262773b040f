//! Shared error types for the services crate.

use thiserror::Error;

use drill_core::model::AnswerError;

/// Errors emitted by session services.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session has not been started")]
    NotStarted,
    #[error("session already completed")]
    Completed,
    #[error(transparent)]
    Answer(#[from] AnswerError),
}

impl SessionError {
    /// True when the caller should simply re-prompt; no state was changed.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SessionError::Answer(_))
    }
}
