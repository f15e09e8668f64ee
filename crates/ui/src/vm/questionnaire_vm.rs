use services::{AnswerOutcome, QuestionnaireRun, QuestionnaireService, SessionError};
use survey_core::model::SessionId;

use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionnaireOutcome {
    Continue,
    Completed,
}

/// Result of opening the questionnaire for a route's session token.
pub enum OpenedQuestionnaire {
    Ready(QuestionnaireVm),
    /// Nothing to answer: the session is (now) finalized.
    Finished,
}

/// Everything the question card renders for the current step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionCardVm {
    pub prompt: String,
    pub step_label: String,
    pub progress_percent: u32,
    pub progress_label: String,
}

pub struct QuestionnaireVm {
    run: QuestionnaireRun,
}

impl QuestionnaireVm {
    #[must_use]
    pub fn new(run: QuestionnaireRun) -> Self {
        Self { run }
    }

    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.run.session_id()
    }

    #[must_use]
    pub fn card(&self) -> Option<QuestionCardVm> {
        let question = self.run.current_question()?;
        let percent = self.run.progress_percent();
        Some(QuestionCardVm {
            prompt: question.text().to_string(),
            step_label: format!("Step {} of {}", self.run.step_number(), self.run.total()),
            progress_percent: percent,
            progress_label: format!("{percent}% Complete"),
        })
    }

    /// Every question is answered but the session is not finalized yet,
    /// e.g. because finalizing after the last answer failed.
    #[must_use]
    pub fn needs_finish(&self) -> bool {
        self.run.is_exhausted() && !self.run.is_finalized()
    }

    /// Store `answer` for the current step, or retry finalization when
    /// nothing is left to answer.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::MissingSession` if the session record is gone and
    /// `ViewError::Unknown` for other failures. The current step is kept.
    pub async fn answer(
        &mut self,
        questionnaire: &QuestionnaireService,
        answer: bool,
    ) -> Result<QuestionnaireOutcome, ViewError> {
        if self.needs_finish() {
            return self.finish(questionnaire).await;
        }
        match questionnaire.answer_current(&mut self.run, answer).await {
            Ok(AnswerOutcome::Continue) => Ok(QuestionnaireOutcome::Continue),
            Ok(AnswerOutcome::Completed(_)) | Err(SessionError::Completed) => {
                Ok(QuestionnaireOutcome::Completed)
            }
            Err(err) => {
                let view_err = ViewError::from(&err);
                if view_err == ViewError::Unknown {
                    tracing::error!(session_id = %self.run.session_id(), error = %err, "failed to record answer");
                }
                Err(view_err)
            }
        }
    }

    /// Finalize a run whose questions are all answered.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::MissingSession` if the session record is gone and
    /// `ViewError::Unknown` for other failures; the run can be retried.
    pub async fn finish(
        &mut self,
        questionnaire: &QuestionnaireService,
    ) -> Result<QuestionnaireOutcome, ViewError> {
        match questionnaire.finish_empty(&mut self.run).await {
            Ok(_) => Ok(QuestionnaireOutcome::Completed),
            Err(err) => {
                let view_err = ViewError::from(&err);
                if view_err == ViewError::Unknown {
                    tracing::error!(session_id = %self.run.session_id(), error = %err, "failed to finalize session");
                }
                Err(view_err)
            }
        }
    }
}

/// Open the run for `raw_session_id`, finishing it right away when there is
/// nothing to answer.
///
/// # Errors
///
/// Returns `ViewError::MissingSession` for a malformed or unknown token and
/// `ViewError::Unknown` for storage failures.
pub async fn open_questionnaire(
    questionnaire: &QuestionnaireService,
    raw_session_id: &str,
) -> Result<OpenedQuestionnaire, ViewError> {
    let session_id: SessionId = raw_session_id.parse().map_err(|_| {
        tracing::warn!(raw = raw_session_id, "malformed session token in route");
        ViewError::MissingSession
    })?;

    let mut run = match questionnaire.open_run(session_id).await {
        Ok(run) => run,
        Err(SessionError::Completed) => return Ok(OpenedQuestionnaire::Finished),
        Err(err) => {
            let view_err = ViewError::from(&err);
            if view_err == ViewError::Unknown {
                tracing::error!(session_id = %session_id, error = %err, "failed to load questions");
            }
            return Err(view_err);
        }
    };

    if run.is_exhausted() {
        questionnaire.finish_empty(&mut run).await.map_err(|err| {
            tracing::error!(session_id = %session_id, error = %err, "failed to finish empty questionnaire");
            ViewError::Unknown
        })?;
        return Ok(OpenedQuestionnaire::Finished);
    }

    Ok(OpenedQuestionnaire::Ready(QuestionnaireVm::new(run)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use services::{Clock, SessionBootstrap};
    use storage::repository::{
        InMemoryRepository, NewQuestionRecord, QuestionRepository, ResponseRepository,
        SessionRepository, StorageError,
    };
    use survey_core::model::Response;
    use survey_core::time::fixed_now;

    /// YES counts fail while `down` is set; everything else hits memory.
    #[derive(Clone)]
    struct CountOutage {
        inner: InMemoryRepository,
        down: Arc<AtomicBool>,
    }

    #[async_trait::async_trait]
    impl ResponseRepository for CountOutage {
        async fn upsert_response(&self, response: &Response) -> Result<(), StorageError> {
            self.inner.upsert_response(response).await
        }

        async fn responses_for_session(
            &self,
            id: SessionId,
        ) -> Result<Vec<Response>, StorageError> {
            self.inner.responses_for_session(id).await
        }

        async fn list_responses(&self) -> Result<Vec<Response>, StorageError> {
            self.inner.list_responses().await
        }

        async fn count_yes_for_session(&self, id: SessionId) -> Result<u32, StorageError> {
            if self.down.load(Ordering::SeqCst) {
                return Err(StorageError::Connection("down".into()));
            }
            self.inner.count_yes_for_session(id).await
        }
    }

    fn service(repo: &InMemoryRepository) -> QuestionnaireService {
        QuestionnaireService::new(
            Clock::fixed(fixed_now()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        )
    }

    async fn started(repo: &InMemoryRepository) -> SessionId {
        SessionBootstrap::new(Clock::fixed(fixed_now()), Arc::new(repo.clone()))
            .start(None)
            .await
            .unwrap()
            .session_id
    }

    #[tokio::test]
    async fn malformed_token_is_missing_session() {
        let repo = InMemoryRepository::new();
        let result = open_questionnaire(&service(&repo), "not-a-uuid").await;
        assert!(matches!(result, Err(ViewError::MissingSession)));
    }

    #[tokio::test]
    async fn empty_questionnaire_finishes_on_open() {
        let repo = InMemoryRepository::new();
        let id = started(&repo).await;

        let opened = open_questionnaire(&service(&repo), &id.to_string()).await.unwrap();
        assert!(matches!(opened, OpenedQuestionnaire::Finished));
        let stored = repo.get_session(id).await.unwrap().unwrap();
        assert!(stored.is_completed());
    }

    #[tokio::test]
    async fn card_reports_step_and_progress() {
        let repo = InMemoryRepository::new();
        for text in ["Alpha?", "Beta?"] {
            repo.insert_question(NewQuestionRecord::new(text, fixed_now()).unwrap())
                .await
                .unwrap();
        }
        let id = started(&repo).await;
        let svc = service(&repo);

        let OpenedQuestionnaire::Ready(mut vm) =
            open_questionnaire(&svc, &id.to_string()).await.unwrap()
        else {
            panic!("expected a ready questionnaire");
        };
        let card = vm.card().unwrap();
        assert_eq!(card.prompt, "Alpha?");
        assert_eq!(card.step_label, "Step 1 of 2");
        assert_eq!(card.progress_label, "50% Complete");

        assert_eq!(vm.answer(&svc, true).await.unwrap(), QuestionnaireOutcome::Continue);
        assert_eq!(vm.card().unwrap().step_label, "Step 2 of 2");
        assert_eq!(vm.answer(&svc, false).await.unwrap(), QuestionnaireOutcome::Completed);
        assert!(vm.card().is_none());
    }

    #[tokio::test]
    async fn answering_again_retries_failed_finalization() {
        let repo = InMemoryRepository::new();
        repo.insert_question(NewQuestionRecord::new("Only?", fixed_now()).unwrap())
            .await
            .unwrap();
        let id = started(&repo).await;
        let down = Arc::new(AtomicBool::new(true));
        let svc = QuestionnaireService::new(
            Clock::fixed(fixed_now()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(CountOutage {
                inner: repo.clone(),
                down: Arc::clone(&down),
            }),
        );

        let OpenedQuestionnaire::Ready(mut vm) =
            open_questionnaire(&svc, &id.to_string()).await.unwrap()
        else {
            panic!("expected a ready questionnaire");
        };

        let err = vm.answer(&svc, true).await.unwrap_err();
        assert_eq!(err, ViewError::Unknown);
        assert!(vm.card().is_none());
        assert!(vm.needs_finish());

        down.store(false, Ordering::SeqCst);
        assert_eq!(vm.answer(&svc, true).await.unwrap(), QuestionnaireOutcome::Completed);
        assert!(!vm.needs_finish());
        let stored = repo.get_session(id).await.unwrap().unwrap();
        assert!(stored.is_completed());
        assert_eq!(stored.score(), Some(1));
    }
}
