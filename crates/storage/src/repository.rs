use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use survey_core::model::{
    Question, QuestionError, QuestionId, QuestionStats, Response, ResponseSession, SessionId,
    SessionScore, normalize_question_text, sort_for_delivery,
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Insert shape for a question; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestionRecord {
    pub text: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl NewQuestionRecord {
    /// An active question with validated text.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank or too long.
    pub fn new(text: &str, created_at: DateTime<Utc>) -> Result<Self, QuestionError> {
        Ok(Self {
            text: normalize_question_text(text)?,
            is_active: true,
            created_at,
        })
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// Result of a conditional finalization write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// This call wrote completion time, score and grade.
    Finalized,
    /// The session had already been finalized; nothing was written.
    AlreadyCompleted,
}

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Insert a question and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn insert_question(&self, record: NewQuestionRecord) -> Result<QuestionId, StorageError>;

    /// Insert every record or none of them, returning ids in input order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any record cannot be stored; nothing is kept.
    async fn insert_questions(
        &self,
        records: Vec<NewQuestionRecord>,
    ) -> Result<Vec<QuestionId>, StorageError>;

    /// Active questions ordered by creation time, then id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or mapping failures.
    async fn list_active_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// Every question, active or not, in delivery order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or mapping failures.
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn count_active_questions(&self) -> Result<u32, StorageError>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a new session record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if a session with the same id exists.
    async fn create_session(&self, session: &ResponseSession) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on read or mapping failures.
    async fn get_session(&self, id: SessionId) -> Result<Option<ResponseSession>, StorageError>;

    /// Write completion time, score and grade unless the session is already completed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the session does not exist.
    async fn finalize_session(
        &self,
        id: SessionId,
        score: &SessionScore,
        completed_at: DateTime<Utc>,
    ) -> Result<FinalizeOutcome, StorageError>;

    /// All sessions, most recently started first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or mapping failures.
    async fn list_sessions(&self) -> Result<Vec<ResponseSession>, StorageError>;
}

#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Insert or overwrite the answer for `(session_id, question_id)` in one write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the session or question does not exist.
    async fn upsert_response(&self, response: &Response) -> Result<(), StorageError>;

    /// Responses of one session in question delivery order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or mapping failures.
    async fn responses_for_session(&self, id: SessionId) -> Result<Vec<Response>, StorageError>;

    /// Every stored response, grouped by session and in question order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or mapping failures.
    async fn list_responses(&self) -> Result<Vec<Response>, StorageError>;

    /// Number of YES answers of the session on currently active questions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn count_yes_for_session(&self, id: SessionId) -> Result<u32, StorageError>;
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Per-question YES/NO counts over all responses, in question order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or mapping failures.
    async fn question_answer_stats(&self) -> Result<Vec<QuestionStats>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<Question>>>,
    sessions: Arc<Mutex<HashMap<SessionId, ResponseSession>>>,
    responses: Arc<Mutex<HashMap<(SessionId, QuestionId), Response>>>,
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn count_u32(len: usize) -> Result<u32, StorageError> {
    u32::try_from(len).map_err(|_| StorageError::Serialization(format!("count overflow: {len}")))
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn ordered_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self.questions.lock().map_err(poisoned)?;
        let mut questions = guard.clone();
        sort_for_delivery(&mut questions);
        Ok(questions)
    }

    fn order_responses(&self, mut responses: Vec<Response>) -> Result<Vec<Response>, StorageError> {
        let questions = self.ordered_questions()?;
        let position: HashMap<QuestionId, usize> = questions
            .iter()
            .enumerate()
            .map(|(idx, q)| (q.id(), idx))
            .collect();
        responses.sort_by_key(|r| {
            (
                r.session_id,
                position.get(&r.question_id).copied().unwrap_or(usize::MAX),
            )
        });
        Ok(responses)
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn insert_question(&self, record: NewQuestionRecord) -> Result<QuestionId, StorageError> {
        let ids = self.insert_questions(vec![record]).await?;
        ids.into_iter()
            .next()
            .ok_or_else(|| StorageError::Serialization("no id assigned".into()))
    }

    async fn insert_questions(
        &self,
        records: Vec<NewQuestionRecord>,
    ) -> Result<Vec<QuestionId>, StorageError> {
        let mut guard = self.questions.lock().map_err(poisoned)?;
        let first = guard.iter().map(|q| q.id().value()).max().unwrap_or(0) + 1;
        let staged = records
            .iter()
            .zip(first..)
            .map(|(record, next)| {
                Question::from_persisted(
                    QuestionId::new(next),
                    &record.text,
                    record.is_active,
                    record.created_at,
                )
                .map_err(|e| StorageError::Serialization(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let ids = staged.iter().map(Question::id).collect();
        guard.extend(staged);
        Ok(ids)
    }

    async fn list_active_questions(&self) -> Result<Vec<Question>, StorageError> {
        Ok(self
            .ordered_questions()?
            .into_iter()
            .filter(Question::is_active)
            .collect())
    }

    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        self.ordered_questions()
    }

    async fn count_active_questions(&self) -> Result<u32, StorageError> {
        let guard = self.questions.lock().map_err(poisoned)?;
        count_u32(guard.iter().filter(|q| q.is_active()).count())
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn create_session(&self, session: &ResponseSession) -> Result<(), StorageError> {
        let mut guard = self.sessions.lock().map_err(poisoned)?;
        if guard.contains_key(&session.id()) {
            return Err(StorageError::Conflict);
        }
        guard.insert(session.id(), session.clone());
        Ok(())
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<ResponseSession>, StorageError> {
        let guard = self.sessions.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    async fn finalize_session(
        &self,
        id: SessionId,
        score: &SessionScore,
        completed_at: DateTime<Utc>,
    ) -> Result<FinalizeOutcome, StorageError> {
        let mut guard = self.sessions.lock().map_err(poisoned)?;
        let session = guard.get_mut(&id).ok_or(StorageError::NotFound)?;
        if session.is_completed() {
            return Ok(FinalizeOutcome::AlreadyCompleted);
        }
        session
            .finalize(score, completed_at)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(FinalizeOutcome::Finalized)
    }

    async fn list_sessions(&self) -> Result<Vec<ResponseSession>, StorageError> {
        let guard = self.sessions.lock().map_err(poisoned)?;
        let mut sessions: Vec<ResponseSession> = guard.values().cloned().collect();
        sessions.sort_by(|a, b| {
            b.started_at()
                .cmp(&a.started_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(sessions)
    }
}

#[async_trait]
impl ResponseRepository for InMemoryRepository {
    async fn upsert_response(&self, response: &Response) -> Result<(), StorageError> {
        {
            let sessions = self.sessions.lock().map_err(poisoned)?;
            if !sessions.contains_key(&response.session_id) {
                return Err(StorageError::NotFound);
            }
        }
        {
            let questions = self.questions.lock().map_err(poisoned)?;
            if !questions.iter().any(|q| q.id() == response.question_id) {
                return Err(StorageError::NotFound);
            }
        }
        let mut guard = self.responses.lock().map_err(poisoned)?;
        guard.insert(response.key(), response.clone());
        Ok(())
    }

    async fn responses_for_session(&self, id: SessionId) -> Result<Vec<Response>, StorageError> {
        let found: Vec<Response> = {
            let guard = self.responses.lock().map_err(poisoned)?;
            guard
                .values()
                .filter(|r| r.session_id == id)
                .cloned()
                .collect()
        };
        self.order_responses(found)
    }

    async fn list_responses(&self) -> Result<Vec<Response>, StorageError> {
        let all: Vec<Response> = {
            let guard = self.responses.lock().map_err(poisoned)?;
            guard.values().cloned().collect()
        };
        self.order_responses(all)
    }

    async fn count_yes_for_session(&self, id: SessionId) -> Result<u32, StorageError> {
        let active: Vec<QuestionId> = {
            let guard = self.questions.lock().map_err(poisoned)?;
            guard
                .iter()
                .filter(|q| q.is_active())
                .map(Question::id)
                .collect()
        };
        let guard = self.responses.lock().map_err(poisoned)?;
        count_u32(
            guard
                .values()
                .filter(|r| r.session_id == id && r.answer && active.contains(&r.question_id))
                .count(),
        )
    }
}

#[async_trait]
impl StatsRepository for InMemoryRepository {
    async fn question_answer_stats(&self) -> Result<Vec<QuestionStats>, StorageError> {
        let questions = self.ordered_questions()?;
        let guard = self.responses.lock().map_err(poisoned)?;
        let mut out = Vec::with_capacity(questions.len());
        for question in questions {
            let mut yes = 0_u32;
            let mut no = 0_u32;
            for response in guard.values().filter(|r| r.question_id == question.id()) {
                if response.answer {
                    yes = yes.saturating_add(1);
                } else {
                    no = no.saturating_add(1);
                }
            }
            out.push(QuestionStats::new(question.id(), question.text(), yes, no));
        }
        Ok(out)
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub responses: Arc<dyn ResponseRepository>,
    pub stats: Arc<dyn StatsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Wire every repository slot to the same backend.
    #[must_use]
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: QuestionRepository
            + SessionRepository
            + ResponseRepository
            + StatsRepository
            + Clone
            + 'static,
    {
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo.clone());
        let responses: Arc<dyn ResponseRepository> = Arc::new(repo.clone());
        let stats: Arc<dyn StatsRepository> = Arc::new(repo);
        Self {
            questions,
            sessions,
            responses,
            stats,
        }
    }
}
