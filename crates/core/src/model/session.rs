use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::grade::{Grade, SessionScore};
use crate::model::ids::SessionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionRecordError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("completion time, score and grade must be set together")]
    InconsistentFinalization,

    #[error("session already completed")]
    AlreadyCompleted,
}

/// Lifecycle of a session: `InProgress` until finalized, then `Completed` for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    InProgress,
    Completed,
}

impl SessionStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SessionStatus::InProgress => "In Progress",
            SessionStatus::Completed => "Completed",
        }
    }
}

/// One respondent's run through the questionnaire.
///
/// Created with only its id and start time, then mutated exactly once more
/// when it is finalized with a completion time, score and grade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSession {
    id: SessionId,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    score: Option<u32>,
    grade: Option<Grade>,
}

impl ResponseSession {
    /// A fresh, unfinalized session.
    #[must_use]
    pub fn start(id: SessionId, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            started_at,
            completed_at: None,
            score: None,
            grade: None,
        }
    }

    /// Rehydrate a session from storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionRecordError::InvalidTimeRange` if it completed before it started,
    /// and `SessionRecordError::InconsistentFinalization` if only part of the
    /// finalization fields are present.
    pub fn from_persisted(
        id: SessionId,
        started_at: DateTime<Utc>,
        completed_at: Option<DateTime<Utc>>,
        score: Option<u32>,
        grade: Option<Grade>,
    ) -> Result<Self, SessionRecordError> {
        match (completed_at, score, grade) {
            (None, None, None) => {}
            (Some(completed), Some(_), Some(_)) => {
                if completed < started_at {
                    return Err(SessionRecordError::InvalidTimeRange);
                }
            }
            _ => return Err(SessionRecordError::InconsistentFinalization),
        }

        Ok(Self {
            id,
            started_at,
            completed_at,
            score,
            grade,
        })
    }

    /// Record the final score and completion time.
    ///
    /// # Errors
    ///
    /// Returns `SessionRecordError::AlreadyCompleted` on a finalized session and
    /// `SessionRecordError::InvalidTimeRange` if `completed_at` precedes the start.
    pub fn finalize(
        &mut self,
        score: &SessionScore,
        completed_at: DateTime<Utc>,
    ) -> Result<(), SessionRecordError> {
        if self.is_completed() {
            return Err(SessionRecordError::AlreadyCompleted);
        }
        if completed_at < self.started_at {
            return Err(SessionRecordError::InvalidTimeRange);
        }
        self.completed_at = Some(completed_at);
        self.score = Some(score.score());
        self.grade = Some(score.grade());
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn score(&self) -> Option<u32> {
        self.score
    }

    #[must_use]
    pub fn grade(&self) -> Option<Grade> {
        self.grade
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.is_completed() {
            SessionStatus::Completed
        } else {
            SessionStatus::InProgress
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn new_session_is_in_progress() {
        let session = ResponseSession::start(SessionId::generate(), fixed_now());
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.score(), None);
        assert_eq!(session.grade(), None);
    }

    #[test]
    fn finalize_sets_all_fields_once() {
        let mut session = ResponseSession::start(SessionId::generate(), fixed_now());
        let score = SessionScore::compute(3, 4).unwrap();
        let done = fixed_now() + Duration::minutes(2);

        session.finalize(&score, done).unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.completed_at(), Some(done));
        assert_eq!(session.score(), Some(3));
        assert_eq!(session.grade(), Some(Grade::Excellent));

        let again = session.finalize(&SessionScore::compute(0, 4).unwrap(), done);
        assert_eq!(again, Err(SessionRecordError::AlreadyCompleted));
        assert_eq!(session.score(), Some(3));
    }

    #[test]
    fn persisted_partial_finalization_is_rejected() {
        let err = ResponseSession::from_persisted(
            SessionId::generate(),
            fixed_now(),
            Some(fixed_now()),
            None,
            Some(Grade::Good),
        )
        .unwrap_err();
        assert_eq!(err, SessionRecordError::InconsistentFinalization);
    }

    #[test]
    fn persisted_completion_before_start_is_rejected() {
        let err = ResponseSession::from_persisted(
            SessionId::generate(),
            fixed_now(),
            Some(fixed_now() - Duration::seconds(1)),
            Some(1),
            Some(Grade::Average),
        )
        .unwrap_err();
        assert_eq!(err, SessionRecordError::InvalidTimeRange);
    }
}
