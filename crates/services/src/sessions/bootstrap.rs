use std::sync::Arc;

use storage::repository::SessionRepository;
use survey_core::model::{ResponseSession, SessionId};

use crate::Clock;
use crate::error::SessionError;

/// Outcome of resolving the caller's session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStart {
    pub session_id: SessionId,
    /// `true` when a new session record was inserted by this call.
    pub created: bool,
    /// `true` when the reused session is already finalized.
    pub completed: bool,
}

/// Resolves or creates the session a respondent answers under.
#[derive(Clone)]
pub struct SessionBootstrap {
    clock: Clock,
    sessions: Arc<dyn SessionRepository>,
}

impl SessionBootstrap {
    #[must_use]
    pub fn new(clock: Clock, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { clock, sessions }
    }

    /// Reuse `existing` when given, otherwise create a fresh session record.
    ///
    /// A reused token never creates a record.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownSession` if `existing` has no stored record,
    /// or `SessionError::Storage` on repository failures.
    pub async fn start(&self, existing: Option<SessionId>) -> Result<SessionStart, SessionError> {
        if let Some(id) = existing {
            let Some(session) = self.sessions.get_session(id).await? else {
                tracing::warn!(session_id = %id, "session token has no stored record");
                return Err(SessionError::UnknownSession(id));
            };
            tracing::debug!(session_id = %id, completed = session.is_completed(), "reusing session");
            return Ok(SessionStart {
                session_id: id,
                created: false,
                completed: session.is_completed(),
            });
        }

        let session = ResponseSession::start(SessionId::generate(), self.clock.now());
        self.sessions.create_session(&session).await?;
        tracing::info!(session_id = %session.id(), "session created");

        Ok(SessionStart {
            session_id: session.id(),
            created: true,
            completed: false,
        })
    }
}
