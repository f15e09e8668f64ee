use sqlx::Row;
use survey_core::model::QuestionStats;

use super::{
    SqliteRepository,
    mapping::{db_err, question_id_from_i64, ser, u32_from_i64},
};
use crate::repository::{StatsRepository, StorageError};

#[async_trait::async_trait]
impl StatsRepository for SqliteRepository {
    async fn question_answer_stats(&self) -> Result<Vec<QuestionStats>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    q.id,
                    q.text,
                    COALESCE(SUM(CASE WHEN r.answer = 1 THEN 1 ELSE 0 END), 0) AS yes_count,
                    COALESCE(SUM(CASE WHEN r.answer = 0 THEN 1 ELSE 0 END), 0) AS no_count
                FROM questions q
                LEFT JOIN responses r ON r.question_id = q.id
                GROUP BY q.id, q.text, q.created_at
                ORDER BY q.created_at ASC, q.id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(QuestionStats::new(
                question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
                row.try_get::<String, _>("text").map_err(ser)?,
                u32_from_i64("yes_count", row.try_get::<i64, _>("yes_count").map_err(ser)?)?,
                u32_from_i64("no_count", row.try_get::<i64, _>("no_count").map_err(ser)?)?,
            ));
        }
        Ok(out)
    }
}
