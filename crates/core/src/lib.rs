#![forbid(unsafe_code)]

//! Pure domain logic for the arithmetic drill: question models, the tiered
//! question generator, answer evaluation and the post-session weakness report.

pub mod error;
pub mod generator;
pub mod model;
pub mod rng;
pub mod time;
pub mod weakness;

pub use error::Error;
pub use generator::{DifficultyTier, GeneratorError, MAX_ATTEMPTS, QuestionGenerator};
pub use time::Clock;
pub use weakness::{WeaknessEntry, WeaknessKind, WeaknessReport, analyze_weakness};
