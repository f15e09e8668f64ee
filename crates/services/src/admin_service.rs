use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use storage::repository::{
    QuestionRepository, ResponseRepository, SessionRepository, StatsRepository,
};
use survey_core::model::{Grade, QuestionId, QuestionStats, SessionId, SessionStatus};

use crate::error::AdminError;

/// One answered question inside a session detail row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseDetail {
    pub question_id: QuestionId,
    pub question: String,
    pub answer: bool,
    pub answered_at: DateTime<Utc>,
}

/// A session with its outcome and answers, for the admin dashboard.
///
/// Presentation-agnostic: the UI formats timestamps and labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDetail {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub score: Option<u32>,
    pub grade: Option<Grade>,
    pub status: SessionStatus,
    pub responses: Vec<ResponseDetail>,
}

/// Everything the admin screen renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdminDashboard {
    /// Every question in creation order, with YES/NO tallies.
    pub question_stats: Vec<QuestionStats>,
    /// Every session, newest start first.
    pub sessions: Vec<SessionDetail>,
}

impl AdminDashboard {
    #[must_use]
    pub fn completed_sessions(&self) -> usize {
        self.sessions
            .iter()
            .filter(|s| s.status == SessionStatus::Completed)
            .count()
    }
}

/// Read-only aggregation over questions, sessions, and responses.
#[derive(Clone)]
pub struct AdminService {
    questions: Arc<dyn QuestionRepository>,
    sessions: Arc<dyn SessionRepository>,
    responses: Arc<dyn ResponseRepository>,
    stats: Arc<dyn StatsRepository>,
}

impl AdminService {
    #[must_use]
    pub fn new(
        questions: Arc<dyn QuestionRepository>,
        sessions: Arc<dyn SessionRepository>,
        responses: Arc<dyn ResponseRepository>,
        stats: Arc<dyn StatsRepository>,
    ) -> Self {
        Self {
            questions,
            sessions,
            responses,
            stats,
        }
    }

    /// Load question statistics and session details.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Storage` on repository failures and
    /// `AdminError::OrphanResponse` if a response points at a missing question.
    pub async fn dashboard(&self) -> Result<AdminDashboard, AdminError> {
        let question_stats = self.stats.question_answer_stats().await?;
        let questions: HashMap<QuestionId, String> = self
            .questions
            .list_questions()
            .await?
            .into_iter()
            .map(|q| (q.id(), q.text().to_owned()))
            .collect();

        let mut by_session: HashMap<SessionId, Vec<ResponseDetail>> = HashMap::new();
        for response in self.responses.list_responses().await? {
            let question = questions
                .get(&response.question_id)
                .ok_or(AdminError::OrphanResponse(response.question_id.value()))?;
            by_session
                .entry(response.session_id)
                .or_default()
                .push(ResponseDetail {
                    question_id: response.question_id,
                    question: question.clone(),
                    answer: response.answer,
                    answered_at: response.answered_at,
                });
        }

        let sessions: Vec<SessionDetail> = self
            .sessions
            .list_sessions()
            .await?
            .into_iter()
            .map(|session| SessionDetail {
                session_id: session.id(),
                started_at: session.started_at(),
                completed_at: session.completed_at(),
                score: session.score(),
                grade: session.grade(),
                status: session.status(),
                responses: by_session.remove(&session.id()).unwrap_or_default(),
            })
            .collect();

        tracing::debug!(
            questions = question_stats.len(),
            sessions = sessions.len(),
            "admin dashboard loaded"
        );

        Ok(AdminDashboard {
            question_stats,
            sessions,
        })
    }
}
