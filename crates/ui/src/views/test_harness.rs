use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{AdminService, AppServices, Clock, QuestionnaireService, ResultService, SessionBootstrap};
use storage::repository::Storage;
use survey_core::time::fixed_now;

use crate::context::{AppContext, SessionAnchor, UiApp};
use crate::views::{AdminView, CompleteView, QuestionsView, StartView};

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn bootstrap(&self) -> Arc<SessionBootstrap> {
        self.services.bootstrap()
    }

    fn questionnaire(&self) -> Arc<QuestionnaireService> {
        self.services.questionnaire()
    }

    fn results(&self) -> Arc<ResultService> {
        self.services.results()
    }

    fn admin(&self) -> Arc<AdminService> {
        self.services.admin()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Start,
    Questions(String),
    Complete(String),
    Admin,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    anchor: SessionAnchor,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    let anchor = props.anchor.clone();
    use_context_provider(|| AppContext::with_anchor(&app, anchor));
    let view = props.view.clone();
    use_context_provider(|| view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Start => rsx! { StartView {} },
        ViewKind::Questions(session_id) => rsx! { QuestionsView { session_id } },
        ViewKind::Complete(session_id) => rsx! { CompleteView { session_id } },
        ViewKind::Admin => rsx! { AdminView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub anchor: SessionAnchor,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Rebuild and let pending resources resolve.
    pub async fn settle(&mut self) {
        self.rebuild();
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, storage: &Storage) -> ViewHarness {
    let services = AppServices::from_storage(storage, Clock::fixed(fixed_now()));
    let app = Arc::new(TestApp { services });
    let anchor = SessionAnchor::default();

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            anchor: anchor.clone(),
        },
    );

    ViewHarness { dom, anchor }
}
