use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

struct Migration {
    version: i64,
    statements: &'static [&'static str],
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    statements: &[
        r"
            CREATE TABLE IF NOT EXISTS questions (
                id INTEGER PRIMARY KEY,
                text TEXT NOT NULL CHECK (length(trim(text)) > 0),
                is_active INTEGER NOT NULL DEFAULT 1 CHECK (is_active IN (0, 1)),
                created_at TEXT NOT NULL
            )
        ",
        r"
            CREATE TABLE IF NOT EXISTS response_sessions (
                id TEXT PRIMARY KEY,
                started_at TEXT NOT NULL,
                completed_at TEXT,
                score INTEGER CHECK (score IS NULL OR score >= 0),
                grade TEXT CHECK (
                    grade IS NULL OR grade IN ('Excellent', 'Good', 'Average', 'Poor')
                )
            )
        ",
        r"
            CREATE TABLE IF NOT EXISTS responses (
                session_id TEXT NOT NULL,
                question_id INTEGER NOT NULL,
                answer INTEGER NOT NULL CHECK (answer IN (0, 1)),
                answered_at TEXT NOT NULL,
                PRIMARY KEY (session_id, question_id),
                FOREIGN KEY (session_id) REFERENCES response_sessions(id) ON DELETE CASCADE,
                FOREIGN KEY (question_id) REFERENCES questions(id) ON DELETE CASCADE
            )
        ",
        "CREATE INDEX IF NOT EXISTS idx_questions_active_created ON questions (is_active, created_at, id)",
        "CREATE INDEX IF NOT EXISTS idx_responses_question ON responses (question_id, answer)",
        "CREATE INDEX IF NOT EXISTS idx_response_sessions_started ON response_sessions (started_at)",
    ],
}];

/// Applies every migration newer than the recorded schema version, each in
/// its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )
        ",
    )
    .execute(pool)
    .await?;

    let current: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
        .fetch_one(pool)
        .await?;

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let mut tx = pool.begin().await?;
        for statement in migration.statements {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)")
            .bind(migration.version)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!(version = migration.version, "applied schema migration");
    }

    Ok(())
}
