mod answer;
mod question;
mod settings;
mod state;
mod used;

pub use answer::{AnswerError, AnsweredQuestion, Feedback, evaluate, parse_answer};
pub use question::{MAX_ANSWER, Operator, Question, QuestionError};
pub use settings::{MAX_LEVELS, SessionSettings, SettingsError};
pub use state::{Progression, SessionSnapshot, SessionState};
pub use used::UsedQuestions;
