use dioxus::prelude::*;
use dioxus_router::use_navigator;
use survey_core::model::SessionId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::ResultVm;

#[component]
pub fn CompleteView(session_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let results = ctx.results();

    let resource = use_resource(move || {
        let results = results.clone();
        let session_id = session_id.clone();

        async move {
            let Ok(id) = session_id.parse::<SessionId>() else {
                navigator.replace(Route::Start {});
                return Err(ViewError::MissingSession);
            };
            let result = results.result(id).await.map_err(|err| {
                tracing::error!(session_id = %id, error = %err, "failed to load result");
                ViewError::Unknown
            })?;
            Ok::<_, ViewError>(ResultVm::from(&result))
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page complete",
            h1 { "Thank you!" }
            p { class: "lead",
                "We appreciate you taking the time to answer these questions. Your responses have been recorded successfully."
            }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "calculating", "Calculating..." }
                },
                ViewState::Ready(ResultVm::Calculating) => rsx! {
                    p { class: "calculating", "Calculating..." }
                },
                ViewState::Ready(ResultVm::Graded { score_label, grade_label, grade_class }) => rsx! {
                    dl { class: "result",
                        dt { "Score" }
                        dd { "{score_label}" }
                        dt { "Grade" }
                        dd { class: grade_class, "{grade_label}" }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
            }

            p { class: "hint", "You may now close this page." }
        }
    }
}
