use sqlx::SqliteConnection;
use survey_core::model::{Question, QuestionId};

use super::{
    SqliteRepository,
    mapping::{db_err, map_question_row, question_id_from_i64, u32_from_i64},
};
use crate::repository::{NewQuestionRecord, QuestionRepository, StorageError};

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn insert_question(&self, record: NewQuestionRecord) -> Result<QuestionId, StorageError> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        insert_one(&mut conn, record).await
    }

    async fn insert_questions(
        &self,
        records: Vec<NewQuestionRecord>,
    ) -> Result<Vec<QuestionId>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            ids.push(insert_one(&mut tx, record).await?);
        }
        tx.commit().await.map_err(db_err)?;
        Ok(ids)
    }

    async fn list_active_questions(&self) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, text, is_active, created_at
                FROM questions
                WHERE is_active = 1
                ORDER BY created_at ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_question_row).collect()
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, text, is_active, created_at
                FROM questions
                ORDER BY created_at ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_question_row).collect()
    }

    async fn count_active_questions(&self) -> Result<u32, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        u32_from_i64("active question count", count)
    }
}

async fn insert_one(
    conn: &mut SqliteConnection,
    record: NewQuestionRecord,
) -> Result<QuestionId, StorageError> {
    let res = sqlx::query(
        r"
            INSERT INTO questions (text, is_active, created_at)
            VALUES (?1, ?2, ?3)
        ",
    )
    .bind(record.text)
    .bind(record.is_active)
    .bind(record.created_at)
    .execute(conn)
    .await
    .map_err(db_err)?;

    question_id_from_i64(res.last_insert_rowid())
}
