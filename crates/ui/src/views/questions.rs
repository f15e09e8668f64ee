use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{
    OpenedQuestionnaire, QuestionCardVm, QuestionnaireOutcome, QuestionnaireVm,
    open_questionnaire,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Submission {
    Answer(bool),
    /// Every question is answered; finalize again.
    Finish,
}

#[component]
pub fn QuestionsView(session_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let questionnaire = ctx.questionnaire();
    let anchor = ctx.anchor();

    let error = use_signal(|| None::<ViewError>);
    let busy = use_signal(|| false);
    let vm = use_signal(|| None::<QuestionnaireVm>);

    let resource = {
        let questionnaire = questionnaire.clone();
        let session_id = session_id.clone();
        use_resource(move || {
            let questionnaire = questionnaire.clone();
            let session_id = session_id.clone();
            let anchor = anchor.clone();
            let mut vm = vm;

            async move {
                match open_questionnaire(&questionnaire, &session_id).await {
                    Ok(OpenedQuestionnaire::Ready(opened)) => {
                        anchor.set(opened.session_id());
                        vm.set(Some(opened));
                        Ok(())
                    }
                    Ok(OpenedQuestionnaire::Finished) => {
                        navigator.replace(Route::Complete { session_id });
                        Ok(())
                    }
                    Err(ViewError::MissingSession) => {
                        anchor.clear();
                        navigator.replace(Route::Start {});
                        Err(ViewError::MissingSession)
                    }
                    Err(err) => Err(err),
                }
            }
        })
    };

    let on_submit = use_callback(move |submission: Submission| {
        let questionnaire = questionnaire.clone();
        let session_id = session_id.clone();
        let mut vm = vm;
        let mut error = error;
        let mut busy = busy;
        if busy() {
            return;
        }

        spawn(async move {
            busy.set(true);
            let taken = vm.write().take();
            let Some(mut current) = taken else {
                error.set(Some(ViewError::Unknown));
                busy.set(false);
                return;
            };

            let result = match submission {
                Submission::Answer(answer) => current.answer(&questionnaire, answer).await,
                Submission::Finish => current.finish(&questionnaire).await,
            };

            // Put the run back so a failed answer can be retried from the same step.
            vm.set(Some(current));
            busy.set(false);

            match result {
                Ok(QuestionnaireOutcome::Continue) => error.set(None),
                Ok(QuestionnaireOutcome::Completed) => {
                    error.set(None);
                    navigator.push(Route::Complete { session_id });
                }
                Err(ViewError::MissingSession) => {
                    navigator.replace(Route::Start {});
                }
                Err(err) => error.set(Some(err)),
            }
        });
    });

    let state = view_state_from_resource(resource);
    let card = vm.read().as_ref().and_then(QuestionnaireVm::card);
    let needs_finish = vm.read().as_ref().is_some_and(QuestionnaireVm::needs_finish);

    rsx! {
        div { class: "page questionnaire",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(()) => match card {
                    Some(card) => rsx! {
                        QuestionCard {
                            card,
                            busy: busy(),
                            on_submit,
                        }
                    },
                    None if needs_finish => rsx! {
                        FinishCard { busy: busy(), on_submit }
                    },
                    None => rsx! {
                        p { "Loading..." }
                    },
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
            }
            if let Some(err) = error() {
                div { class: "error",
                    p { "{err.message()}" }
                }
            }
        }
    }
}

#[component]
fn QuestionCard(card: QuestionCardVm, busy: bool, on_submit: Callback<Submission>) -> Element {
    rsx! {
        section { class: "progress",
            span { class: "eyebrow", "Questionnaire" }
            p { class: "step", "{card.step_label}" }
            p { class: "percent", "{card.progress_label}" }
            div { class: "progress-track",
                div {
                    class: "progress-fill",
                    style: "width: {card.progress_percent}%",
                }
            }
        }
        section { class: "question-card",
            h2 { class: "prompt", "{card.prompt}" }
            div { class: "answers",
                button {
                    id: "answer-yes",
                    class: "btn answer yes",
                    disabled: busy,
                    onclick: move |_| on_submit.call(Submission::Answer(true)),
                    "YES"
                }
                button {
                    id: "answer-no",
                    class: "btn answer no",
                    disabled: busy,
                    onclick: move |_| on_submit.call(Submission::Answer(false)),
                    "NO"
                }
            }
        }
    }
}

#[component]
fn FinishCard(busy: bool, on_submit: Callback<Submission>) -> Element {
    rsx! {
        section { class: "question-card finish",
            h2 { class: "prompt", "All questions answered" }
            p { "Your answers are saved. Submit them to see your result." }
            div { class: "answers",
                button {
                    id: "submit-answers",
                    class: "btn primary",
                    disabled: busy,
                    onclick: move |_| on_submit.call(Submission::Finish),
                    if busy { "Submitting..." } else { "Submit answers" }
                }
            }
        }
    }
}
