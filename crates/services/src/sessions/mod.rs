mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::SessionService;
pub use view::{ReviewItem, SessionReport, SessionResult};
pub use workflow::{
    NextAction, SessionAnswerResult, SessionEvent, SessionLoopService, SessionResponse,
};
