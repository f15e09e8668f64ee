//! Initial question set and idempotent seeding.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use survey_core::model::QuestionError;
use thiserror::Error;

use crate::repository::{NewQuestionRecord, QuestionRepository, StorageError};

pub const DEFAULT_QUESTIONS: [&str; 8] = [
    "Does your business have a written plan for the next twelve months?",
    "Do you review your monthly cash flow?",
    "Do you track where new customers hear about you?",
    "Do you have a website that takes orders or bookings?",
    "Have you raised your prices in the last year?",
    "Do you know your three biggest competitors by name?",
    "Could the business run for two weeks without you?",
    "Do you ask customers for feedback after a sale?",
];

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SeedError {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to read questions file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid questions file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One question to seed and whether it starts active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedQuestion {
    pub text: String,
    pub active: bool,
}

impl SeedQuestion {
    #[must_use]
    pub fn active(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            active: true,
        }
    }
}

/// One entry of a questions file: either a bare string or `{ "text": ..., "active": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuestionEntry {
    Text(String),
    Full {
        text: String,
        #[serde(default = "default_active")]
        active: bool,
    },
}

fn default_active() -> bool {
    true
}

impl From<QuestionEntry> for SeedQuestion {
    fn from(entry: QuestionEntry) -> Self {
        match entry {
            QuestionEntry::Text(text) => SeedQuestion::active(text),
            QuestionEntry::Full { text, active } => SeedQuestion { text, active },
        }
    }
}

/// Parse a JSON array of questions.
///
/// # Errors
///
/// Returns `SeedError::Parse` for malformed JSON.
pub fn parse_questions(raw: &str) -> Result<Vec<SeedQuestion>, SeedError> {
    let entries: Vec<QuestionEntry> = serde_json::from_str(raw)?;
    Ok(entries.into_iter().map(SeedQuestion::from).collect())
}

/// Read questions from `path`, or the built-in set when `path` is `None`.
///
/// # Errors
///
/// Returns `SeedError::Io` if the file cannot be read and `SeedError::Parse`
/// for malformed JSON.
pub fn load_questions(path: Option<&Path>) -> Result<Vec<SeedQuestion>, SeedError> {
    match path {
        Some(path) => parse_questions(&std::fs::read_to_string(path)?),
        None => Ok(default_questions()),
    }
}

#[must_use]
pub fn default_questions() -> Vec<SeedQuestion> {
    DEFAULT_QUESTIONS.iter().map(|text| SeedQuestion::active(*text)).collect()
}

/// Insert `questions` when the question table is empty.
///
/// Creation times are spaced one second apart from `now` so delivery order
/// follows the given order. Every entry is validated first and the batch is
/// inserted atomically, so a failure leaves the table empty and a later run
/// seeds again. Returns how many questions were inserted.
///
/// # Errors
///
/// Returns `SeedError::Question` for invalid text and `SeedError::Storage` on
/// repository failures; in both cases nothing is inserted.
pub async fn seed_questions_if_empty(
    repo: &dyn QuestionRepository,
    questions: &[SeedQuestion],
    now: DateTime<Utc>,
) -> Result<u32, SeedError> {
    let existing = repo.list_questions().await?;
    if !existing.is_empty() {
        tracing::info!(count = existing.len(), "questions already present, skipping seed");
        return Ok(0);
    }

    let mut records = Vec::with_capacity(questions.len());
    let mut offset = Duration::zero();
    for question in questions {
        let record = NewQuestionRecord::new(&question.text, now + offset)?;
        records.push(if question.active { record } else { record.inactive() });
        offset += Duration::seconds(1);
    }

    let ids = repo.insert_questions(records).await?;
    let inserted = u32::try_from(ids.len())
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    tracing::info!(inserted, "seeded questions");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::repository::InMemoryRepository;
    use survey_core::model::{Question, QuestionId};
    use survey_core::time::fixed_now;

    /// Batch inserts fail while `down` is set.
    struct BatchOutage {
        inner: InMemoryRepository,
        down: Arc<AtomicBool>,
    }

    #[async_trait::async_trait]
    impl QuestionRepository for BatchOutage {
        async fn insert_question(
            &self,
            record: NewQuestionRecord,
        ) -> Result<QuestionId, StorageError> {
            self.inner.insert_question(record).await
        }

        async fn insert_questions(
            &self,
            records: Vec<NewQuestionRecord>,
        ) -> Result<Vec<QuestionId>, StorageError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(StorageError::Connection("disk full".into()));
            }
            self.inner.insert_questions(records).await
        }

        async fn list_active_questions(&self) -> Result<Vec<Question>, StorageError> {
            self.inner.list_active_questions().await
        }

        async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
            self.inner.list_questions().await
        }

        async fn count_active_questions(&self) -> Result<u32, StorageError> {
            self.inner.count_active_questions().await
        }
    }

    #[tokio::test]
    async fn failed_seed_leaves_table_empty_for_next_run() {
        let repo = BatchOutage {
            inner: InMemoryRepository::new(),
            down: Arc::new(AtomicBool::new(true)),
        };
        let err = seed_questions_if_empty(&repo, &default_questions(), fixed_now())
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Storage(StorageError::Connection(_))));
        assert!(repo.list_questions().await.unwrap().is_empty());

        repo.down.store(false, Ordering::SeqCst);
        let inserted = seed_questions_if_empty(&repo, &default_questions(), fixed_now())
            .await
            .unwrap();
        assert_eq!(inserted, 8);
    }

    #[tokio::test]
    async fn seeds_once_in_order() {
        let repo = InMemoryRepository::new();
        let inserted = seed_questions_if_empty(&repo, &default_questions(), fixed_now())
            .await
            .unwrap();
        assert_eq!(inserted, 8);

        let again = seed_questions_if_empty(&repo, &default_questions(), fixed_now())
            .await
            .unwrap();
        assert_eq!(again, 0);

        let active = repo.list_active_questions().await.unwrap();
        assert_eq!(active.len(), 8);
        assert_eq!(active[0].text(), DEFAULT_QUESTIONS[0]);
        assert_eq!(active[7].text(), DEFAULT_QUESTIONS[7]);
    }

    #[tokio::test]
    async fn invalid_text_inserts_nothing() {
        let repo = InMemoryRepository::new();
        let questions = vec![SeedQuestion::active("Fine?"), SeedQuestion::active("   ")];
        let err = seed_questions_if_empty(&repo, &questions, fixed_now())
            .await
            .unwrap_err();
        assert!(matches!(err, SeedError::Question(_)));
        assert!(repo.list_questions().await.unwrap().is_empty());
    }

    #[test]
    fn parses_strings_and_objects() {
        let parsed = parse_questions(
            r#"["Plain?", {"text": "Object?"}, {"text": "Hidden?", "active": false}]"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            vec![
                SeedQuestion::active("Plain?"),
                SeedQuestion::active("Object?"),
                SeedQuestion {
                    text: "Hidden?".into(),
                    active: false,
                },
            ]
        );
        assert!(matches!(parse_questions("{}"), Err(SeedError::Parse(_))));
    }

    #[tokio::test]
    async fn inactive_entries_are_kept_but_not_delivered() {
        let repo = InMemoryRepository::new();
        let questions = vec![
            SeedQuestion::active("Live?"),
            SeedQuestion {
                text: "Retired?".into(),
                active: false,
            },
        ];
        seed_questions_if_empty(&repo, &questions, fixed_now())
            .await
            .unwrap();
        assert_eq!(repo.list_questions().await.unwrap().len(), 2);
        assert_eq!(repo.count_active_questions().await.unwrap(), 1);
    }
}
