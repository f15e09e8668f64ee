use std::sync::{Arc, Mutex, PoisonError};

use services::{AdminService, AppServices, QuestionnaireService, ResultService, SessionBootstrap};
use survey_core::model::SessionId;

pub trait UiApp: Send + Sync {
    fn bootstrap(&self) -> Arc<SessionBootstrap>;
    fn questionnaire(&self) -> Arc<QuestionnaireService>;
    fn results(&self) -> Arc<ResultService>;
    fn admin(&self) -> Arc<AdminService>;
}

impl UiApp for AppServices {
    fn bootstrap(&self) -> Arc<SessionBootstrap> {
        AppServices::bootstrap(self)
    }

    fn questionnaire(&self) -> Arc<QuestionnaireService> {
        AppServices::questionnaire(self)
    }

    fn results(&self) -> Arc<ResultService> {
        AppServices::results(self)
    }

    fn admin(&self) -> Arc<AdminService> {
        AppServices::admin(self)
    }
}

/// The session token this process is answering under.
///
/// Lives as long as the app; routes carry the same token explicitly.
#[derive(Clone, Default)]
pub struct SessionAnchor(Arc<Mutex<Option<SessionId>>>);

impl SessionAnchor {
    #[must_use]
    pub fn get(&self) -> Option<SessionId> {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, id: SessionId) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(id);
    }

    pub fn clear(&self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[derive(Clone)]
pub struct AppContext {
    anchor: SessionAnchor,

    bootstrap: Arc<SessionBootstrap>,
    questionnaire: Arc<QuestionnaireService>,
    results: Arc<ResultService>,
    admin: Arc<AdminService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self::with_anchor(app, SessionAnchor::default())
    }

    #[must_use]
    pub fn with_anchor(app: &Arc<dyn UiApp>, anchor: SessionAnchor) -> Self {
        Self {
            anchor,
            bootstrap: app.bootstrap(),
            questionnaire: app.questionnaire(),
            results: app.results(),
            admin: app.admin(),
        }
    }

    #[must_use]
    pub fn anchor(&self) -> SessionAnchor {
        self.anchor.clone()
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

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
