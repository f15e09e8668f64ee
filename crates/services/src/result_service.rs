use std::sync::Arc;

use storage::repository::{QuestionRepository, SessionRepository};
use survey_core::model::{SessionId, SessionScore};

use crate::error::SessionError;

/// What the completion screen shows for a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionResult {
    Completed(SessionScore),
    /// No finalized record (yet) for this token.
    Calculating,
}

/// Reads back the stored score and grade for a session.
#[derive(Clone)]
pub struct ResultService {
    questions: Arc<dyn QuestionRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl ResultService {
    #[must_use]
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            questions,
            sessions,
        }
    }

    /// Look up the result for `session_id`.
    ///
    /// A missing session and an unfinalized one both map to
    /// `SessionResult::Calculating`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn result(&self, session_id: SessionId) -> Result<SessionResult, SessionError> {
        let Some(session) = self.sessions.get_session(session_id).await? else {
            tracing::debug!(session_id = %session_id, "no session record for result");
            return Ok(SessionResult::Calculating);
        };

        let (Some(score), Some(grade)) = (session.score(), session.grade()) else {
            return Ok(SessionResult::Calculating);
        };

        let total = self.questions.count_active_questions().await?;
        Ok(SessionResult::Completed(SessionScore::from_persisted(
            score, total, grade,
        )))
    }
}
