use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Largest answer a drill question may have.
pub const MAX_ANSWER: u32 = 100;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("{operand1} - {operand2} would be negative")]
    NegativeResult { operand1: u32, operand2: u32 },

    #[error("answer {answer} exceeds 100")]
    AnswerTooLarge { answer: u32 },
}

//
// ─── OPERATOR ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
}

impl Operator {
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
        }
    }

    /// Applies the operator, returning `None` when the result would be negative
    /// or overflow.
    #[must_use]
    pub fn apply(self, lhs: u32, rhs: u32) -> Option<u32> {
        match self {
            Operator::Add => lhs.checked_add(rhs),
            Operator::Sub => lhs.checked_sub(rhs),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single drill problem such as `37 + 25 = ?`.
///
/// The answer always lies in `0..=MAX_ANSWER`; construction fails otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    operand1: u32,
    operand2: u32,
    operator: Operator,
    correct_answer: u32,
    display_text: String,
}

impl Question {
    /// Builds a question and computes its answer.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::NegativeResult` for a subtraction below zero and
    /// `QuestionError::AnswerTooLarge` when the answer exceeds `MAX_ANSWER`.
    pub fn new(operand1: u32, operator: Operator, operand2: u32) -> Result<Self, QuestionError> {
        let correct_answer = match operator.apply(operand1, operand2) {
            Some(answer) => answer,
            None if operator == Operator::Sub => {
                return Err(QuestionError::NegativeResult { operand1, operand2 });
            }
            None => return Err(QuestionError::AnswerTooLarge { answer: u32::MAX }),
        };
        if correct_answer > MAX_ANSWER {
            return Err(QuestionError::AnswerTooLarge {
                answer: correct_answer,
            });
        }

        Ok(Self {
            operand1,
            operand2,
            operator,
            correct_answer,
            display_text: Self::render(operand1, operator, operand2),
        })
    }

    /// Builds a question from operands already known to be in range.
    pub(crate) fn from_valid(operand1: u32, operator: Operator, operand2: u32) -> Self {
        let correct_answer = operator.apply(operand1, operand2).unwrap_or_default();
        debug_assert!(correct_answer <= MAX_ANSWER);
        Self {
            operand1,
            operand2,
            operator,
            correct_answer,
            display_text: Self::render(operand1, operator, operand2),
        }
    }

    /// Renders the prompt text used both for display and duplicate detection.
    #[must_use]
    pub fn render(operand1: u32, operator: Operator, operand2: u32) -> String {
        format!("{operand1} {operator} {operand2} = ?")
    }

    #[must_use]
    pub fn operand1(&self) -> u32 {
        self.operand1
    }

    #[must_use]
    pub fn operand2(&self) -> u32 {
        self.operand2
    }

    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    #[must_use]
    pub fn correct_answer(&self) -> u32 {
        self.correct_answer
    }

    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display_text
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_renders_and_answers() {
        let q = Question::new(12, Operator::Add, 9).unwrap();
        assert_eq!(q.correct_answer(), 21);
        assert_eq!(q.display_text(), "12 + 9 = ?");
        assert_eq!(q.to_string(), "12 + 9 = ?");
    }

    #[test]
    fn subtraction_uses_ascii_minus() {
        let q = Question::new(50, Operator::Sub, 5).unwrap();
        assert_eq!(q.correct_answer(), 45);
        assert_eq!(q.display_text(), "50 - 5 = ?");
    }

    #[test]
    fn boundaries_are_inclusive() {
        assert_eq!(Question::new(50, Operator::Add, 50).unwrap().correct_answer(), 100);
        assert_eq!(Question::new(30, Operator::Sub, 30).unwrap().correct_answer(), 0);
    }

    #[test]
    fn rejects_out_of_range_answers() {
        let err = Question::new(60, Operator::Add, 41).unwrap_err();
        assert_eq!(err, QuestionError::AnswerTooLarge { answer: 101 });

        let err = Question::new(10, Operator::Sub, 11).unwrap_err();
        assert!(matches!(err, QuestionError::NegativeResult { .. }));
    }

    #[test]
    fn serializes_operator_as_symbol() {
        let q = Question::new(7, Operator::Sub, 3).unwrap();
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["operator"], "-");
        assert_eq!(json["correct_answer"], 4);
        assert_eq!(json["display_text"], "7 - 3 = ?");
    }
}
