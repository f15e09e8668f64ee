use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{AdminView, CompleteView, QuestionsView, StartView};

#[derive(Clone, Routable, PartialEq, Debug)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", StartView)] Start {},
        #[route("/questions/:session_id", QuestionsView)] Questions { session_id: String },
        #[route("/complete/:session_id", CompleteView)] Complete { session_id: String },
        #[route("/admin", AdminView)] Admin {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "topbar",
                h1 { class: "brand", "BusinessInsights" }
                nav {
                    Link { to: Route::Start {}, "Start" }
                    Link { to: Route::Admin {}, "Admin" }
                }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
