use survey_core::model::{Response, SessionId};

use super::{
    SqliteRepository,
    mapping::{db_err, map_response_row, question_id_to_i64, u32_from_i64},
};
use crate::repository::{ResponseRepository, StorageError};

#[async_trait::async_trait]
impl ResponseRepository for SqliteRepository {
    async fn upsert_response(&self, response: &Response) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO responses (session_id, question_id, answer, answered_at)
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(session_id, question_id) DO UPDATE SET
                    answer = excluded.answer,
                    answered_at = excluded.answered_at
            ",
        )
        .bind(response.session_id.to_string())
        .bind(question_id_to_i64(response.question_id)?)
        .bind(response.answer)
        .bind(response.answered_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn responses_for_session(&self, id: SessionId) -> Result<Vec<Response>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT r.session_id, r.question_id, r.answer, r.answered_at
                FROM responses r
                JOIN questions q ON q.id = r.question_id
                WHERE r.session_id = ?1
                ORDER BY q.created_at ASC, q.id ASC
            ",
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_response_row).collect()
    }

    async fn list_responses(&self) -> Result<Vec<Response>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT r.session_id, r.question_id, r.answer, r.answered_at
                FROM responses r
                JOIN questions q ON q.id = r.question_id
                ORDER BY r.session_id ASC, q.created_at ASC, q.id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_response_row).collect()
    }

    async fn count_yes_for_session(&self, id: SessionId) -> Result<u32, StorageError> {
        let count: i64 = sqlx::query_scalar(
            r"
                SELECT COUNT(*)
                FROM responses r
                JOIN questions q ON q.id = r.question_id
                WHERE r.session_id = ?1 AND r.answer = 1 AND q.is_active = 1
            ",
        )
        .bind(id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        u32_from_i64("yes count", count)
    }
}
