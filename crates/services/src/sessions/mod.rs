mod bootstrap;
mod run;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use bootstrap::{SessionBootstrap, SessionStart};
pub use run::QuestionnaireRun;
pub use workflow::{AnswerOutcome, QuestionnaireService};
