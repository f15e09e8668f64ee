use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AdminVm, QuestionStatRowVm, SessionCardVm, map_admin_dashboard};

#[component]
pub fn AdminView() -> Element {
    let ctx = use_context::<AppContext>();
    let admin = ctx.admin();

    let resource = use_resource(move || {
        let admin = admin.clone();
        async move {
            let dashboard = admin.dashboard().await.map_err(|err| {
                tracing::error!(error = %err, "failed to load admin dashboard");
                ViewError::Unknown
            })?;
            Ok::<_, ViewError>(map_admin_dashboard(&dashboard))
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page admin",
            h1 { "Admin Dashboard" }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    Dashboard { data }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "error",
                        p { "{err.message()}" }
                        button {
                            class: "btn",
                            onclick: move |_| {
                                let mut resource = resource;
                                resource.restart();
                            },
                            "Retry"
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn Dashboard(data: AdminVm) -> Element {
    rsx! {
        p { class: "totals",
            "Sessions: {data.total_sessions} | Completed: {data.completed_sessions}"
        }

        h2 { "Question Statistics" }
        if data.stats.is_empty() {
            p { "No questions yet." }
        } else {
            table { class: "stats",
                thead {
                    tr {
                        th { "Question" }
                        th { "YES" }
                        th { "NO" }
                        th { "YES %" }
                    }
                }
                tbody {
                    for row in data.stats.clone() {
                        StatRow { row }
                    }
                }
            }
        }

        h2 { "YES-Intensity Heatmap" }
        div { class: "heatmap",
            for row in data.stats.clone() {
                div { class: row.tier_class, title: "{row.question}",
                    span { class: "heat-label", "{row.question}" }
                    span { class: "heat-value", "{row.yes_percent_label}" }
                }
            }
        }

        h2 { "Session Details" }
        if data.sessions.is_empty() {
            p { "No sessions yet." }
        } else {
            ul { class: "sessions",
                for session in data.sessions.iter().cloned() {
                    SessionCard { session }
                }
            }
        }
    }
}

#[component]
fn StatRow(row: QuestionStatRowVm) -> Element {
    rsx! {
        tr {
            td { "{row.question}" }
            td { "{row.yes}" }
            td { "{row.no}" }
            td { "{row.yes_percent_label}" }
        }
    }
}

#[component]
fn SessionCard(session: SessionCardVm) -> Element {
    rsx! {
        li { class: "session-card",
            div { class: "session-head",
                div {
                    p { class: "muted", "Session ID" }
                    p { class: "mono", "{session.session_id}" }
                }
                span { class: session.status_class, "{session.status_label}" }
            }
            dl { class: "session-meta",
                dt { "Started" }
                dd { "{session.started_at_str}" }
                dt { "Completed" }
                dd { "{session.completed_at_str}" }
                dt { "Score" }
                dd { "{session.score_label}" }
                dt { "Grade" }
                dd { class: session.grade_class, "{session.grade_label}" }
            }
            if session.responses.is_empty() {
                p { class: "muted", "No answers recorded." }
            } else {
                ul { class: "responses",
                    for response in session.responses.iter().cloned() {
                        li {
                            span { class: "response-question", "{response.question}" }
                            span { class: response.answer_class, "{response.answer_label}" }
                            span { class: "muted", "{response.answered_at_str}" }
                        }
                    }
                }
            }
        }
    }
}
