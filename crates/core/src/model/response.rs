use chrono::{DateTime, Utc};

use crate::model::ids::{QuestionId, SessionId};

/// One yes/no answer to one question within one session.
///
/// Keyed by `(session_id, question_id)`; storage keeps at most one per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub session_id: SessionId,
    pub question_id: QuestionId,
    pub answer: bool,
    pub answered_at: DateTime<Utc>,
}

impl Response {
    #[must_use]
    pub fn new(
        session_id: SessionId,
        question_id: QuestionId,
        answer: bool,
        answered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            question_id,
            answer,
            answered_at,
        }
    }

    #[must_use]
    pub fn key(&self) -> (SessionId, QuestionId) {
        (self.session_id, self.question_id)
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.answer { "YES" } else { "NO" }
    }
}
