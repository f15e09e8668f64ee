mod ids;
mod question;
mod response;
mod session;
mod stats;

pub use ids::{ParseIdError, QuestionId, SessionId};
pub use question::{
    MAX_QUESTION_LEN, Question, QuestionError, normalize_question_text, sort_for_delivery,
};
pub use response::Response;
pub use session::{ResponseSession, SessionRecordError, SessionStatus};
pub use stats::QuestionStats;

pub use crate::grade::{Grade, GradeError, HeatTier, SessionScore};
