use serde::Serialize;
use thiserror::Error;

/// Highest level the difficulty tiers are defined for.
pub const MAX_LEVELS: u32 = 20;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("questions per level must be > 0")]
    InvalidQuestionsPerLevel,

    #[error("level count must be between 1 and 20, got {0}")]
    InvalidLevelCount(u32),

    #[error("points per correct answer must be > 0")]
    InvalidPointsPerCorrect,
}

/// Shape of a drill session.
///
/// The defaults give the classic 20 levels of 10 questions, 10 points each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionSettings {
    questions_per_level: u32,
    level_count: u32,
    points_per_correct: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            questions_per_level: 10,
            level_count: MAX_LEVELS,
            points_per_correct: 10,
        }
    }
}

impl SessionSettings {
    /// Creates custom session settings.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is zero or the level count exceeds `MAX_LEVELS`.
    pub fn new(
        questions_per_level: u32,
        level_count: u32,
        points_per_correct: u32,
    ) -> Result<Self, SettingsError> {
        if questions_per_level == 0 {
            return Err(SettingsError::InvalidQuestionsPerLevel);
        }
        if !(1..=MAX_LEVELS).contains(&level_count) {
            return Err(SettingsError::InvalidLevelCount(level_count));
        }
        if points_per_correct == 0 {
            return Err(SettingsError::InvalidPointsPerCorrect);
        }

        Ok(Self {
            questions_per_level,
            level_count,
            points_per_correct,
        })
    }

    #[must_use]
    pub fn questions_per_level(&self) -> u32 {
        self.questions_per_level
    }

    #[must_use]
    pub fn level_count(&self) -> u32 {
        self.level_count
    }

    #[must_use]
    pub fn points_per_correct(&self) -> u32 {
        self.points_per_correct
    }

    /// Number of questions in a full session.
    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.questions_per_level.saturating_mul(self.level_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_game() {
        let s = SessionSettings::default();
        assert_eq!(s.questions_per_level(), 10);
        assert_eq!(s.level_count(), 20);
        assert_eq!(s.points_per_correct(), 10);
        assert_eq!(s.total_questions(), 200);
    }

    #[test]
    fn rejects_invalid_values() {
        assert_eq!(
            SessionSettings::new(0, 5, 10).unwrap_err(),
            SettingsError::InvalidQuestionsPerLevel
        );
        assert_eq!(
            SessionSettings::new(3, 21, 10).unwrap_err(),
            SettingsError::InvalidLevelCount(21)
        );
        assert_eq!(
            SessionSettings::new(3, 0, 10).unwrap_err(),
            SettingsError::InvalidLevelCount(0)
        );
        assert_eq!(
            SessionSettings::new(3, 2, 0).unwrap_err(),
            SettingsError::InvalidPointsPerCorrect
        );
        assert!(SessionSettings::new(1, 1, 1).is_ok());
    }
}
