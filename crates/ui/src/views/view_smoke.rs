use std::sync::Arc;

use chrono::Duration;
use storage::repository::{
    InMemoryRepository, NewQuestionRecord, QuestionRepository, ResponseRepository,
    SessionRepository, StatsRepository, Storage, StorageError,
};
use survey_core::model::{QuestionId, QuestionStats, Response, ResponseSession, SessionId, SessionScore};
use survey_core::time::fixed_now;

use super::test_harness::{ViewKind, setup_view_harness};

async fn seed_questions(repo: &InMemoryRepository, texts: &[&str]) -> Vec<QuestionId> {
    let mut ids = Vec::new();
    for (idx, text) in texts.iter().enumerate() {
        let at = fixed_now() + Duration::seconds(i64::try_from(idx).unwrap());
        ids.push(
            repo.insert_question(NewQuestionRecord::new(text, at).unwrap())
                .await
                .unwrap(),
        );
    }
    ids
}

async fn open_session(repo: &InMemoryRepository) -> SessionId {
    let session = ResponseSession::start(SessionId::generate(), fixed_now());
    repo.create_session(&session).await.unwrap();
    session.id()
}

#[tokio::test(flavor = "current_thread")]
async fn start_view_smoke_renders_button() {
    let storage = Storage::in_memory();
    let mut harness = setup_view_harness(ViewKind::Start, &storage);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("start-button"), "missing start button in {html}");
    assert!(html.contains("Start"), "missing label in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn questions_view_smoke_renders_first_step() {
    let repo = InMemoryRepository::new();
    seed_questions(&repo, &["Do you have a plan?", "Do you track cash?"]).await;
    let id = open_session(&repo).await;

    let mut harness = setup_view_harness(
        ViewKind::Questions(id.to_string()),
        &Storage::from_repository(repo),
    );
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Step 1 of 2"), "missing step in {html}");
    assert!(html.contains("50% Complete"), "missing progress in {html}");
    assert!(html.contains("Do you have a plan?"), "missing prompt in {html}");
    assert!(html.contains("YES") && html.contains("NO"), "missing answers in {html}");
    assert_eq!(harness.anchor.get(), Some(id));
}

#[tokio::test(flavor = "current_thread")]
async fn complete_view_smoke_renders_grade() {
    let repo = InMemoryRepository::new();
    seed_questions(&repo, &["A?", "B?", "C?", "D?"]).await;
    let id = open_session(&repo).await;
    repo.finalize_session(id, &SessionScore::compute(3, 4).unwrap(), fixed_now())
        .await
        .unwrap();

    let mut harness =
        setup_view_harness(ViewKind::Complete(id.to_string()), &Storage::from_repository(repo));
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Thank you!"), "missing heading in {html}");
    assert!(html.contains("3 of 4 answered YES"), "missing score in {html}");
    assert!(html.contains("Excellent"), "missing grade in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn complete_view_smoke_unknown_session_is_calculating() {
    let storage = Storage::in_memory();
    let mut harness =
        setup_view_harness(ViewKind::Complete(SessionId::generate().to_string()), &storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Calculating..."), "missing neutral state in {html}");
    assert!(!html.contains("Something went wrong"), "unexpected error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn admin_view_smoke_renders_stats_and_sessions() {
    let repo = InMemoryRepository::new();
    let questions = seed_questions(&repo, &["Website?"]).await;
    let id = open_session(&repo).await;
    repo.upsert_response(&Response::new(id, questions[0], true, fixed_now()))
        .await
        .unwrap();

    let mut harness = setup_view_harness(ViewKind::Admin, &Storage::from_repository(repo));
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Question Statistics"), "missing stats table in {html}");
    assert!(html.contains("heat heat-strong"), "missing heat tier in {html}");
    assert!(html.contains("100%"), "missing percent in {html}");
    assert!(html.contains("In Progress"), "missing session status in {html}");
    assert!(html.contains(&id.to_string()), "missing session id in {html}");
}

struct FailingStats;

#[async_trait::async_trait]
impl StatsRepository for FailingStats {
    async fn question_answer_stats(&self) -> Result<Vec<QuestionStats>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn admin_view_smoke_renders_error_state() {
    let mut storage = Storage::in_memory();
    storage.stats = Arc::new(FailingStats);

    let mut harness = setup_view_harness(ViewKind::Admin, &storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn admin_view_smoke_shows_loading_before_data() {
    let storage = Storage::in_memory();
    let mut harness = setup_view_harness(ViewKind::Admin, &storage);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Loading..."), "missing loading text in {html}");
    assert!(!html.contains("Idle"), "internal state leaked in {html}");
}
