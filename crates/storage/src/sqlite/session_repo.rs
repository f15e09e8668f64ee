use chrono::{DateTime, Utc};
use survey_core::model::{ResponseSession, SessionId, SessionScore};

use super::{
    SqliteRepository,
    mapping::{db_err, map_session_row},
};
use crate::repository::{FinalizeOutcome, SessionRepository, StorageError};

#[async_trait::async_trait]
impl SessionRepository for SqliteRepository {
    async fn create_session(&self, session: &ResponseSession) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO response_sessions (id, started_at)
                VALUES (?1, ?2)
            ",
        )
        .bind(session.id().to_string())
        .bind(session.started_at())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<ResponseSession>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, started_at, completed_at, score, grade
                FROM response_sessions
                WHERE id = ?1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_session_row).transpose()
    }

    async fn finalize_session(
        &self,
        id: SessionId,
        score: &SessionScore,
        completed_at: DateTime<Utc>,
    ) -> Result<FinalizeOutcome, StorageError> {
        let res = sqlx::query(
            r"
                UPDATE response_sessions
                SET completed_at = ?2, score = ?3, grade = ?4
                WHERE id = ?1 AND completed_at IS NULL
            ",
        )
        .bind(id.to_string())
        .bind(completed_at)
        .bind(i64::from(score.score()))
        .bind(score.grade().as_str())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if res.rows_affected() > 0 {
            return Ok(FinalizeOutcome::Finalized);
        }

        let exists = sqlx::query("SELECT 1 FROM response_sessions WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        match exists {
            Some(_) => Ok(FinalizeOutcome::AlreadyCompleted),
            None => Err(StorageError::NotFound),
        }
    }

    async fn list_sessions(&self) -> Result<Vec<ResponseSession>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, started_at, completed_at, score, grade
                FROM response_sessions
                ORDER BY started_at DESC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_session_row).collect()
    }
}
