use std::sync::Arc;

use shared::protocol::BuildResponse;

use crate::{
    error::WorkflowError,
    test_support::{
        fixture, fixture_with_presenter, sample_advice, FakeBackend, Gate, RecordingPresenter,
    },
    transport::resolve_site_location,
    types::{BuildOutcome, EntryKind},
};

fn site(url: &str) -> BuildResponse {
    BuildResponse {
        site_url: url.to_string(),
    }
}

#[tokio::test]
async fn build_without_advice_warns_and_sends_nothing() {
    let fx = fixture(FakeBackend::new());

    let outcome = fx.session.trigger_build().await;

    assert_eq!(
        outcome,
        BuildOutcome::Rejected(WorkflowError::PreconditionNotMet)
    );
    assert_eq!(fx.backend.build_call_count().await, 0);
    let entries = fx.session.log().entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::Warning);
    assert!(entries[0].content.contains("Run the assistant first"));
}

#[tokio::test]
async fn build_uses_retained_input_and_fresh_theme() {
    let fx = fixture(FakeBackend::new());
    fx.backend.reply_advice(Ok(sample_advice())).await;
    fx.backend
        .reply_build(Ok(site("/generated_sites/site_20240501093000/index.html")))
        .await;
    fx.session.submit().await;

    // Edits after the advice only affect the theme of the build.
    fx.form
        .update(|form| {
            form.competitors = "z, y".into();
            form.industry = "florist".into();
        })
        .await;
    fx.form.set_theme("bold").await;

    fx.session.trigger_build().await;

    let calls = fx.backend.build_calls.lock().await;
    assert_eq!(calls.len(), 1);
    let request = &calls[0];
    assert_eq!(request.competitors, vec!["a", "b", "c"]);
    assert_eq!(request.industry, "bakery");
    assert_eq!(request.goals, "sell cakes");
    assert_eq!(request.project_descriptions, "none");
    assert_eq!(request.theme, "bold");
    assert_eq!(request.style, "bold");
    assert_eq!(request.ai_copy, sample_advice().copywriting);
    assert_eq!(request.seo_tips, sample_advice().seo_tips);
    assert_eq!(request.design_guidelines, sample_advice().design_guidelines);
}

#[tokio::test]
async fn build_competitors_follow_latest_successful_advice_only() {
    let fx = fixture(FakeBackend::new());
    fx.backend.reply_advice(Ok(sample_advice())).await;
    fx.backend
        .reply_advice(Err(WorkflowError::ServiceFailure {
            status: 500,
            detail: None,
        }))
        .await;
    fx.backend.reply_build(Ok(site("/generated_sites/s/index.html"))).await;

    fx.session.submit().await;
    fx.form.update(|form| form.competitors = "late, entry".into()).await;
    fx.session.submit().await;
    fx.session.trigger_build().await;

    let calls = fx.backend.build_calls.lock().await;
    assert_eq!(calls[0].competitors, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn successful_build_ends_log_with_site_url_and_presents_it() {
    let fx = fixture(FakeBackend::new());
    fx.backend.reply_advice(Ok(sample_advice())).await;
    fx.backend
        .reply_build(Ok(site("/generated_sites/site_20240501093000/index.html")))
        .await;
    fx.session.submit().await;

    let outcome = fx.session.trigger_build().await;

    assert_eq!(
        outcome,
        BuildOutcome::Built {
            site_url: "/generated_sites/site_20240501093000/index.html".into(),
            location: "http://127.0.0.1:8000/generated_sites/site_20240501093000/index.html"
                .into(),
        }
    );
    let entries = fx.session.log().entries().await;
    let last = entries.last().expect("site entry");
    assert_eq!(last.kind, EntryKind::SiteLink);
    assert!(last
        .content
        .contains("/generated_sites/site_20240501093000/index.html"));
    let building = &entries[entries.len() - 2];
    assert_eq!(building.kind, EntryKind::Status);

    assert_eq!(
        *fx.presenter.presented.lock().await,
        vec!["http://127.0.0.1:8000/generated_sites/site_20240501093000/index.html"]
    );
}

#[tokio::test]
async fn presenter_failure_does_not_turn_into_an_error_entry() {
    let fx = fixture_with_presenter(
        FakeBackend::new(),
        RecordingPresenter {
            fail: true,
            ..RecordingPresenter::default()
        },
    );
    fx.backend.reply_advice(Ok(sample_advice())).await;
    fx.backend.reply_build(Ok(site("https://sites.example/abc/"))).await;
    fx.session.submit().await;

    let outcome = fx.session.trigger_build().await;

    assert!(matches!(outcome, BuildOutcome::Built { .. }));
    let last = fx.session.log().last_entry().await.expect("entry");
    assert_eq!(last.kind, EntryKind::SiteLink);
    assert!(last.content.contains("https://sites.example/abc/"));
}

#[tokio::test]
async fn failed_build_appends_error_and_keeps_state() {
    let fx = fixture(FakeBackend::new());
    fx.backend.reply_advice(Ok(sample_advice())).await;
    fx.backend
        .reply_build(Err(WorkflowError::ServiceFailure {
            status: 500,
            detail: Some("disk full".into()),
        }))
        .await;
    fx.session.submit().await;
    let before = fx.session.state().snapshot().await;

    let outcome = fx.session.trigger_build().await;

    assert!(matches!(outcome, BuildOutcome::Failed(WorkflowError::ServiceFailure { status: 500, .. })));
    assert_eq!(fx.session.state().snapshot().await, before);
    let last = fx.session.log().last_entry().await.expect("entry");
    assert_eq!(last.kind, EntryKind::Error);
    assert_eq!(last.content, "❌ Error generating site: server error: 500 (disk full)");
    assert!(fx.presenter.presented.lock().await.is_empty());
    assert!(!fx.session.build_in_flight());
}

#[tokio::test]
async fn concurrent_build_trigger_is_rejected_with_warning() {
    let gate = Arc::new(Gate::default());
    let fx = fixture(FakeBackend::new().with_build_gate(gate.clone()));
    fx.backend.reply_advice(Ok(sample_advice())).await;
    fx.backend.reply_build(Ok(site("/generated_sites/one/index.html"))).await;
    fx.session.submit().await;

    let first = tokio::spawn({
        let session = fx.session.clone();
        async move { session.trigger_build().await }
    });
    gate.entered.notified().await;

    assert_eq!(
        fx.session.trigger_build().await,
        BuildOutcome::Rejected(WorkflowError::BuildInProgress)
    );
    assert_eq!(fx.backend.build_call_count().await, 1);

    gate.release.notify_one();
    assert!(matches!(
        first.await.expect("join build"),
        BuildOutcome::Built { .. }
    ));
    assert!(!fx.session.build_in_flight());

    let kinds: Vec<_> = fx
        .session
        .log()
        .entries()
        .await
        .iter()
        .map(|entry| entry.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            EntryKind::Echo,
            EntryKind::Advice,
            EntryKind::Status,
            EntryKind::Warning,
            EntryKind::SiteLink,
        ]
    );
}

#[test]
fn relative_site_urls_resolve_against_base() {
    let base = "http://localhost:8000/".parse().expect("base");
    assert_eq!(
        resolve_site_location(Some(&base), "/generated_sites/s/index.html"),
        "http://localhost:8000/generated_sites/s/index.html"
    );
    assert_eq!(
        resolve_site_location(Some(&base), "https://cdn.example/site/"),
        "https://cdn.example/site/"
    );
    assert_eq!(
        resolve_site_location(None, "/generated_sites/s/index.html"),
        "/generated_sites/s/index.html"
    );
}
