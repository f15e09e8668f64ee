use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;

const STYLE: Asset = asset!("/assets/style.css");

#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: STYLE }
        document::Title { "BusinessInsights" }

        ErrorBoundary {
            handle_error: |errors: ErrorContext| {
                tracing::error!(?errors, "render failed");
                rsx! {
                    div { class: "page fatal",
                        h1 { "The questionnaire stopped unexpectedly" }
                        p { "Please restart the application. Your saved answers are kept." }
                    }
                }
            },
            Router::<Route> {}
        }
    }
}
