use dioxus::prelude::*;
use services::SessionError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// The session token is missing, malformed, or has no stored record.
    MissingSession,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::MissingSession => "Your session could not be found. Please start again.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<&SessionError> for ViewError {
    fn from(err: &SessionError) -> Self {
        match err {
            SessionError::UnknownSession(_) => ViewError::MissingSession,
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::StorageError;
    use survey_core::model::SessionId;

    #[test]
    fn unknown_session_maps_to_missing_session() {
        let err = SessionError::UnknownSession(SessionId::generate());
        assert_eq!(ViewError::from(&err), ViewError::MissingSession);
    }

    #[test]
    fn storage_failures_stay_generic() {
        let err = SessionError::Storage(StorageError::Connection("down".into()));
        assert_eq!(ViewError::from(&err), ViewError::Unknown);
        assert_eq!(
            ViewError::Unknown.message(),
            "Something went wrong. Please try again."
        );
    }
}
