use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::ViewError;
use crate::vm::begin_session;

#[component]
pub fn StartView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let bootstrap = ctx.bootstrap();
    let anchor = ctx.anchor();

    let error = use_signal(|| None::<ViewError>);
    let busy = use_signal(|| false);

    let on_start = use_callback(move |()| {
        let bootstrap = bootstrap.clone();
        let anchor = anchor.clone();
        let mut error = error;
        let mut busy = busy;
        if busy() {
            return;
        }

        spawn(async move {
            busy.set(true);
            let outcome = begin_session(&bootstrap, &anchor).await;
            busy.set(false);

            // No navigation without a stored session record.
            match outcome {
                Ok(start) => {
                    error.set(None);
                    let session_id = start.session_id.to_string();
                    if start.completed {
                        navigator.push(Route::Complete { session_id });
                    } else {
                        navigator.push(Route::Questions { session_id });
                    }
                }
                Err(err) => error.set(Some(err)),
            }
        });
    });

    rsx! {
        div { class: "page start",
            p { class: "lead", "A short yes/no check-up for your business." }
            button {
                id: "start-button",
                class: "btn primary start-button",
                disabled: busy(),
                onclick: move |_| on_start.call(()),
                if busy() { "Starting..." } else { "Start" }
            }
            if let Some(err) = error() {
                p { class: "error", "{err.message()}" }
            }
        }
    }
}
