use services::{SessionBootstrap, SessionError, SessionStart};

use crate::context::SessionAnchor;
use crate::views::ViewError;

/// Resolve the anchored session, or create one, and anchor the result.
///
/// A stale anchor (no stored record) is dropped and a fresh session created.
///
/// # Errors
///
/// Returns `ViewError::Unknown` when the session record cannot be created or
/// read. The anchor is left untouched in that case.
pub async fn begin_session(
    bootstrap: &SessionBootstrap,
    anchor: &SessionAnchor,
) -> Result<SessionStart, ViewError> {
    let start = match bootstrap.start(anchor.get()).await {
        Ok(start) => start,
        Err(SessionError::UnknownSession(stale)) => {
            tracing::warn!(session_id = %stale, "dropping stale session anchor");
            anchor.clear();
            bootstrap.start(None).await.map_err(|err| {
                tracing::error!(error = %err, "failed to create session");
                ViewError::Unknown
            })?
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to start session");
            return Err(ViewError::Unknown);
        }
    };

    anchor.set(start.session_id);
    Ok(start)
}
