use std::sync::Arc;

use storage::repository::{
    FinalizeOutcome, QuestionRepository, ResponseRepository, SessionRepository,
};
use survey_core::model::{Response, ResponseSession, SessionId, SessionRecordError, SessionScore};

use super::run::QuestionnaireRun;
use crate::Clock;
use crate::error::SessionError;

/// Result of answering the current question of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The answer was stored and the pointer moved to the next question.
    Continue,
    /// The last answer was stored and the session finalized.
    Completed(SessionScore),
}

/// Orchestrates answering and finalization against persisted state.
#[derive(Clone)]
pub struct QuestionnaireService {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
    sessions: Arc<dyn SessionRepository>,
    responses: Arc<dyn ResponseRepository>,
}

impl QuestionnaireService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionRepository>,
        sessions: Arc<dyn SessionRepository>,
        responses: Arc<dyn ResponseRepository>,
    ) -> Self {
        Self {
            clock,
            questions,
            sessions,
            responses,
        }
    }

    /// Open a run over the active questions for an in-progress session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownSession` for a missing record,
    /// `SessionError::Completed` for a finalized session, and
    /// `SessionError::Storage` on repository failures.
    pub async fn open_run(&self, session_id: SessionId) -> Result<QuestionnaireRun, SessionError> {
        let session = self.load_session(session_id).await?;
        if session.is_completed() {
            return Err(SessionError::Completed);
        }

        let questions = self.questions.list_active_questions().await?;
        tracing::debug!(session_id = %session_id, total = questions.len(), "questionnaire run opened");
        Ok(QuestionnaireRun::new(session_id, questions))
    }

    /// Store the answer to the current question, then advance.
    ///
    /// The pointer moves only after the response is persisted. When the
    /// answered question was the last one, the session is finalized before
    /// returning. If that finalization fails the run stays exhausted but
    /// unfinalized; `finish_empty` retries it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session is already finalized,
    /// `SessionError::Exhausted` if no question is left, and
    /// `SessionError::Storage` if the write fails (the pointer stays put).
    pub async fn answer_current(
        &self,
        run: &mut QuestionnaireRun,
        answer: bool,
    ) -> Result<AnswerOutcome, SessionError> {
        if run.is_finalized() {
            return Err(SessionError::Completed);
        }
        let Some(question) = run.current_question() else {
            return Err(SessionError::Exhausted);
        };
        let question_id = question.id();
        let session_id = run.session_id();

        if self.load_session(session_id).await?.is_completed() {
            run.mark_finalized();
            return Err(SessionError::Completed);
        }

        let response = Response::new(session_id, question_id, answer, self.clock.now());
        if let Err(err) = self.responses.upsert_response(&response).await {
            tracing::warn!(
                session_id = %session_id,
                question_id = question_id.value(),
                error = %err,
                "failed to store answer"
            );
            return Err(err.into());
        }
        tracing::debug!(
            session_id = %session_id,
            question_id = question_id.value(),
            answer = response.label(),
            "answer stored"
        );

        let was_last = run.is_last();
        run.advance();
        if !was_last {
            return Ok(AnswerOutcome::Continue);
        }

        let score = self.finalize(session_id).await?;
        run.mark_finalized();
        Ok(AnswerOutcome::Completed(score))
    }

    /// Finalize a run with nothing left to answer.
    ///
    /// Covers a questionnaire with zero active questions (score 0, grade
    /// Poor) and retrying a finalization that failed after the last answer
    /// was stored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Pending` while questions remain unanswered, or
    /// any error from `finalize`.
    pub async fn finish_empty(&self, run: &mut QuestionnaireRun) -> Result<SessionScore, SessionError> {
        if !run.is_exhausted() {
            let remaining = run.total() - run.step_number() + 1;
            return Err(SessionError::Pending { remaining });
        }
        let score = self.finalize(run.session_id()).await?;
        run.mark_finalized();
        Ok(score)
    }

    /// Compute and store score and grade for a session.
    ///
    /// `total` is the active question count and `score` the number of YES
    /// answers on active questions. Finalizing a completed session changes
    /// nothing and returns the stored score.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownSession` for a missing record and
    /// `SessionError::Storage` on repository failures.
    pub async fn finalize(&self, session_id: SessionId) -> Result<SessionScore, SessionError> {
        let session = self.load_session(session_id).await?;
        let total = self.questions.count_active_questions().await?;
        if session.is_completed() {
            tracing::debug!(session_id = %session_id, "session already finalized");
            return stored_score(&session, total);
        }

        let yes = self.responses.count_yes_for_session(session_id).await?;
        let score = SessionScore::compute(yes, total)?;
        let completed_at = self.clock.now();

        match self
            .sessions
            .finalize_session(session_id, &score, completed_at)
            .await?
        {
            FinalizeOutcome::Finalized => {
                tracing::info!(
                    session_id = %session_id,
                    score = score.score(),
                    total = score.total(),
                    grade = %score.grade(),
                    "session finalized"
                );
                Ok(score)
            }
            FinalizeOutcome::AlreadyCompleted => {
                // Another writer finished first; report what it stored.
                let session = self.load_session(session_id).await?;
                stored_score(&session, total)
            }
        }
    }

    async fn load_session(&self, session_id: SessionId) -> Result<ResponseSession, SessionError> {
        self.sessions
            .get_session(session_id)
            .await?
            .ok_or(SessionError::UnknownSession(session_id))
    }
}

fn stored_score(session: &ResponseSession, total: u32) -> Result<SessionScore, SessionError> {
    match (session.score(), session.grade()) {
        (Some(score), Some(grade)) => Ok(SessionScore::from_persisted(score, total, grade)),
        _ => Err(SessionRecordError::InconsistentFinalization.into()),
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
