//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use survey_core::model::{GradeError, SessionId, SessionRecordError};

/// Errors emitted by session bootstrap and the questionnaire run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("unknown session {0}")]
    UnknownSession(SessionId),
    #[error("session already completed")]
    Completed,
    #[error("no question left to answer")]
    Exhausted,
    #[error("{remaining} question(s) still unanswered")]
    Pending { remaining: usize },
    #[error(transparent)]
    Record(#[from] SessionRecordError),
    #[error(transparent)]
    Grade(#[from] GradeError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AdminService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AdminError {
    #[error("response references unknown question {0}")]
    OrphanResponse(u64),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
