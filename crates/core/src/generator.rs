//! Tiered, non-repeating question generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;

use crate::model::{Operator, Question, UsedQuestions};
use crate::rng::{coin_flip, random_in};

/// Candidates drawn before the generator gives up on finding an unused question.
pub const MAX_ATTEMPTS: u32 = 100;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GeneratorError {
    /// Every candidate in the attempt budget was out of range or already used.
    ///
    /// `fallback` is still a valid question (usually a repeat) and has been
    /// recorded in the used set, so callers can keep the session going.
    #[error("no unused question for level {level} after {attempts} attempts")]
    ExhaustedRange {
        level: u32,
        attempts: u32,
        fallback: Question,
    },
}

impl GeneratorError {
    /// The question to ask anyway.
    #[must_use]
    pub fn into_fallback(self) -> Question {
        match self {
            GeneratorError::ExhaustedRange { fallback, .. } => fallback,
        }
    }
}

//
// ─── TIERS ─────────────────────────────────────────────────────────────────────
//

/// Difficulty band a level belongs to.
///
/// | Levels | Operator | Operands |
/// |---|---|---|
/// | 1-5 | `+` | both in 10..=50 |
/// | 6-10 | `-` | a in 20..=70, b in 10..=a-5 |
/// | 11-15 | `+`/`-` | `+`: both in 20..=80; `-`: a in 30..=100, b in 10..=a-10 |
/// | 16+ | `+`/`-` | `+`: a in 40..=99, b in 10..=99-a; `-`: a in 50..=100, b in 20..=a-20 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Addition,
    Subtraction,
    Mixed,
    Advanced,
}

impl DifficultyTier {
    #[must_use]
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=5 => DifficultyTier::Addition,
            6..=10 => DifficultyTier::Subtraction,
            11..=15 => DifficultyTier::Mixed,
            _ => DifficultyTier::Advanced,
        }
    }

    /// Draws raw operands for one candidate. The result may still be out of range.
    fn draw<R: Rng + ?Sized>(self, rng: &mut R) -> (u32, Operator, u32) {
        match self {
            DifficultyTier::Addition => {
                let a = random_in(rng, 10, 50);
                let b = random_in(rng, 10, 50);
                (a, Operator::Add, b)
            }
            DifficultyTier::Subtraction => {
                let a = random_in(rng, 20, 70);
                let b = random_in(rng, 10, a - 5);
                (a, Operator::Sub, b)
            }
            DifficultyTier::Mixed => {
                if coin_flip(rng) {
                    let a = random_in(rng, 20, 80);
                    let b = random_in(rng, 20, 80);
                    (a, Operator::Add, b)
                } else {
                    let a = random_in(rng, 30, 100);
                    let b = random_in(rng, 10, a - 10);
                    (a, Operator::Sub, b)
                }
            }
            DifficultyTier::Advanced => {
                if coin_flip(rng) {
                    let a = random_in(rng, 40, 99);
                    let b = random_in(rng, 10, 99 - a);
                    (a, Operator::Add, b)
                } else {
                    let a = random_in(rng, 50, 100);
                    let b = random_in(rng, 20, a - 20);
                    (a, Operator::Sub, b)
                }
            }
        }
    }

    /// Smallest question of the tier's branch for `operator`.
    fn floor_question(self, operator: Operator) -> Question {
        let (a, b) = match (self, operator) {
            (DifficultyTier::Addition, _) => (10, 10),
            (DifficultyTier::Subtraction, _) => (20, 10),
            (DifficultyTier::Mixed, Operator::Add) => (20, 20),
            (DifficultyTier::Mixed, Operator::Sub) => (30, 10),
            (DifficultyTier::Advanced, Operator::Add) => (40, 10),
            (DifficultyTier::Advanced, Operator::Sub) => (50, 20),
        };
        let operator = match self {
            DifficultyTier::Addition => Operator::Add,
            DifficultyTier::Subtraction => Operator::Sub,
            _ => operator,
        };
        Question::from_valid(a, operator, b)
    }
}

//
// ─── GENERATOR ─────────────────────────────────────────────────────────────────
//

/// Produces questions for a level, avoiding texts already in the used set.
///
/// Deterministic for a seeded RNG.
#[derive(Debug, Clone)]
pub struct QuestionGenerator<R = StdRng> {
    rng: R,
}

impl QuestionGenerator<StdRng> {
    /// Generator with a reproducible sequence.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> QuestionGenerator<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generates an unused question for `level` and records it in `used`.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError::ExhaustedRange` after `MAX_ATTEMPTS` rejected
    /// candidates. The error carries the last in-range candidate (or the tier's
    /// floor question when none was in range), already recorded in `used`.
    pub fn generate(
        &mut self,
        level: u32,
        used: &mut UsedQuestions,
    ) -> Result<Question, GeneratorError> {
        let tier = DifficultyTier::for_level(level);
        let mut last_valid = None;
        let mut last_operator = Operator::Add;

        for _ in 0..MAX_ATTEMPTS {
            let (a, operator, b) = tier.draw(&mut self.rng);
            last_operator = operator;
            let Ok(question) = Question::new(a, operator, b) else {
                continue;
            };
            if !used.contains(question.display_text()) {
                used.insert(question.display_text());
                return Ok(question);
            }
            last_valid = Some(question);
        }

        let fallback = last_valid.unwrap_or_else(|| tier.floor_question(last_operator));
        used.insert(fallback.display_text());
        Err(GeneratorError::ExhaustedRange {
            level,
            attempts: MAX_ATTEMPTS,
            fallback,
        })
    }

    /// Like `generate`, but accepts the fallback question on exhaustion.
    pub fn generate_or_fallback(&mut self, level: u32, used: &mut UsedQuestions) -> Question {
        self.generate(level, used)
            .unwrap_or_else(GeneratorError::into_fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_invariants(q: &Question) {
        let expected = match q.operator() {
            Operator::Add => i64::from(q.operand1()) + i64::from(q.operand2()),
            Operator::Sub => i64::from(q.operand1()) - i64::from(q.operand2()),
        };
        assert_eq!(i64::from(q.correct_answer()), expected, "{q}");
        assert!((0..=100).contains(&expected), "{q}");
        assert_eq!(
            q.display_text(),
            format!("{} {} {} = ?", q.operand1(), q.operator(), q.operand2())
        );
    }

    #[test]
    fn tiers_follow_level_bands() {
        assert_eq!(DifficultyTier::for_level(1), DifficultyTier::Addition);
        assert_eq!(DifficultyTier::for_level(5), DifficultyTier::Addition);
        assert_eq!(DifficultyTier::for_level(6), DifficultyTier::Subtraction);
        assert_eq!(DifficultyTier::for_level(10), DifficultyTier::Subtraction);
        assert_eq!(DifficultyTier::for_level(11), DifficultyTier::Mixed);
        assert_eq!(DifficultyTier::for_level(15), DifficultyTier::Mixed);
        assert_eq!(DifficultyTier::for_level(16), DifficultyTier::Advanced);
        assert_eq!(DifficultyTier::for_level(20), DifficultyTier::Advanced);
        assert_eq!(DifficultyTier::for_level(0), DifficultyTier::Addition);
        assert_eq!(DifficultyTier::for_level(99), DifficultyTier::Advanced);
    }

    #[test]
    fn every_level_produces_valid_questions() {
        let mut generator = QuestionGenerator::seeded(2024);
        let mut used = UsedQuestions::new();
        for level in 1..=20 {
            for _ in 0..50 {
                let q = generator.generate_or_fallback(level, &mut used);
                check_invariants(&q);
            }
        }
    }

    #[test]
    fn operand_ranges_match_tiers() {
        let mut generator = QuestionGenerator::seeded(11);
        let mut used = UsedQuestions::new();
        for _ in 0..300 {
            let q = generator.generate_or_fallback(3, &mut used);
            assert_eq!(q.operator(), Operator::Add);
            assert!((10..=50).contains(&q.operand1()));
            assert!((10..=50).contains(&q.operand2()));
        }
        for _ in 0..300 {
            let q = generator.generate_or_fallback(8, &mut used);
            assert_eq!(q.operator(), Operator::Sub);
            assert!((20..=70).contains(&q.operand1()));
            assert!(q.operand2() >= 10 && q.operand2() + 5 <= q.operand1());
        }
    }

    #[test]
    fn subtraction_branches_keep_first_operand_larger() {
        let mut generator = QuestionGenerator::seeded(5);
        let mut used = UsedQuestions::new();
        for level in [6, 10, 11, 15, 16, 20] {
            for _ in 0..200 {
                let q = generator.generate_or_fallback(level, &mut used);
                if q.operator() == Operator::Sub {
                    assert!(q.operand1() > q.operand2(), "{q}");
                }
            }
        }
    }

    #[test]
    fn mixed_levels_draw_both_operators() {
        let mut generator = QuestionGenerator::seeded(3);
        let mut used = UsedQuestions::new();
        for level in [12, 18] {
            let ops: Vec<Operator> = (0..100)
                .map(|_| generator.generate_or_fallback(level, &mut used).operator())
                .collect();
            assert!(ops.contains(&Operator::Add));
            assert!(ops.contains(&Operator::Sub));
        }
    }

    #[test]
    fn never_repeats_while_space_remains() {
        let mut generator = QuestionGenerator::seeded(42);
        let mut used = UsedQuestions::new();
        let mut seen = std::collections::HashSet::new();
        for level in 1..=20 {
            for _ in 0..10 {
                let q = generator.generate(level, &mut used).unwrap();
                assert!(seen.insert(q.display_text().to_string()), "repeat {q}");
            }
        }
        assert_eq!(used.len(), 200);
    }

    #[test]
    fn accepted_question_is_recorded_as_used() {
        let mut generator = QuestionGenerator::seeded(1);
        let mut used = UsedQuestions::new();
        let q = generator.generate(1, &mut used).unwrap();
        assert!(used.contains(q.display_text()));
        assert_eq!(used.len(), 1);
    }

    #[test]
    fn exhausted_range_falls_back_to_a_repeat() {
        let mut used = UsedQuestions::new();
        for a in 10..=50 {
            for b in 10..=50 {
                used.insert(Question::render(a, Operator::Add, b));
            }
        }
        let before = used.len();

        let mut generator = QuestionGenerator::seeded(9);
        let err = generator.generate(2, &mut used).unwrap_err();
        let GeneratorError::ExhaustedRange {
            level,
            attempts,
            fallback,
        } = err.clone();
        assert_eq!(level, 2);
        assert_eq!(attempts, MAX_ATTEMPTS);
        check_invariants(&fallback);
        assert!(used.contains(fallback.display_text()));
        assert_eq!(used.len(), before);
        assert_eq!(err.into_fallback(), fallback);
    }

    #[test]
    fn same_seed_same_questions() {
        let run = |seed| {
            let mut generator = QuestionGenerator::seeded(seed);
            let mut used = UsedQuestions::new();
            (1..=20)
                .map(|level| generator.generate_or_fallback(level, &mut used))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn floor_questions_are_valid() {
        for tier in [
            DifficultyTier::Addition,
            DifficultyTier::Subtraction,
            DifficultyTier::Mixed,
            DifficultyTier::Advanced,
        ] {
            for op in [Operator::Add, Operator::Sub] {
                let q = tier.floor_question(op);
                check_invariants(&q);
                assert_eq!(Question::new(q.operand1(), q.operator(), q.operand2()).unwrap(), q);
            }
        }
    }
}
