use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::admin_service::AdminService;
use crate::error::AppServicesError;
use crate::result_service::ResultService;
use crate::sessions::{QuestionnaireService, SessionBootstrap};

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    bootstrap: Arc<SessionBootstrap>,
    questionnaire: Arc<QuestionnaireService>,
    results: Arc<ResultService>,
    admin: Arc<AdminService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the connection or migrations fail.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let active = storage.questions.count_active_questions().await?;
        if active == 0 {
            tracing::warn!("no active questions; sessions will finish immediately");
        }
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over a fresh in-memory backend.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::from_storage(&Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let bootstrap = Arc::new(SessionBootstrap::new(clock, Arc::clone(&storage.sessions)));
        let questionnaire = Arc::new(QuestionnaireService::new(
            clock,
            Arc::clone(&storage.questions),
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.responses),
        ));
        let results = Arc::new(ResultService::new(
            Arc::clone(&storage.questions),
            Arc::clone(&storage.sessions),
        ));
        let admin = Arc::new(AdminService::new(
            Arc::clone(&storage.questions),
            Arc::clone(&storage.sessions),
            Arc::clone(&storage.responses),
            Arc::clone(&storage.stats),
        ));

        Self {
            bootstrap,
            questionnaire,
            results,
            admin,
        }
    }

    #[must_use]
    pub fn bootstrap(&self) -> Arc<SessionBootstrap> {
        Arc::clone(&self.bootstrap)
    }

    #[must_use]
    pub fn questionnaire(&self) -> Arc<QuestionnaireService> {
        Arc::clone(&self.questionnaire)
    }

    #[must_use]
    pub fn results(&self) -> Arc<ResultService> {
        Arc::clone(&self.results)
    }

    #[must_use]
    pub fn admin(&self) -> Arc<AdminService> {
        Arc::clone(&self.admin)
    }
}
