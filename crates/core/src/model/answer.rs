use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Raised when a submitted answer cannot be read as an integer.
///
/// Recoverable: the caller re-prompts and no session state changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("please enter a valid number (got {raw:?})")]
    InvalidInput { raw: String },
}

//
// ─── PARSING ───────────────────────────────────────────────────────────────────
//

/// Reads the leading integer from user input.
///
/// Leading whitespace is skipped, an optional sign is accepted and parsing
/// stops at the first non-digit, so `"3.7"` reads as 3 and `" 42 apples"` as 42.
///
/// # Errors
///
/// Returns `AnswerError::InvalidInput` when no digits lead the input or the
/// number does not fit in an `i64`.
pub fn parse_answer(raw: &str) -> Result<i64, AnswerError> {
    let invalid = || AnswerError::InvalidInput {
        raw: raw.to_string(),
    };

    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return Err(invalid());
    }

    let magnitude: i64 = rest[..digits_len].parse().map_err(|_| invalid())?;
    Ok(if negative { -magnitude } else { magnitude })
}

//
// ─── ANSWERED QUESTION ─────────────────────────────────────────────────────────
//

/// A question together with what the player answered. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnsweredQuestion {
    pub question: Question,
    pub user_answer: i64,
    pub is_correct: bool,
    pub level: u32,
}

impl AnsweredQuestion {
    #[must_use]
    pub fn new(question: Question, user_answer: i64, level: u32) -> Self {
        let is_correct = user_answer == i64::from(question.correct_answer());
        Self {
            question,
            user_answer,
            is_correct,
            level,
        }
    }

    #[must_use]
    pub fn feedback(&self) -> Feedback {
        if self.is_correct {
            Feedback::Correct
        } else {
            Feedback::Wrong {
                correct_answer: self.question.correct_answer(),
            }
        }
    }
}

/// Parses `raw` and grades it against `question`.
///
/// # Errors
///
/// Returns `AnswerError::InvalidInput` if `raw` is not an integer.
pub fn evaluate(raw: &str, question: &Question, level: u32) -> Result<AnsweredQuestion, AnswerError> {
    let user_answer = parse_answer(raw)?;
    Ok(AnsweredQuestion::new(question.clone(), user_answer, level))
}

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// What to tell the player right after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Feedback {
    Correct,
    Wrong { correct_answer: u32 },
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Correct => write!(f, "✓ Correct!"),
            Feedback::Wrong { correct_answer } => {
                write!(f, "✗ Wrong! The correct answer is {correct_answer}")
            }
        }
    }
}
