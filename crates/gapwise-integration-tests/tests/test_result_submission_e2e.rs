//! # Result Submission Against a Live Service
//!
//! Serves the real API router on an ephemeral port and submits results
//! through the HTTP client and through the CLI submission path.

use std::sync::Arc;

use gapwise_api::{AppConfig, AppState};
use gapwise_catalog::ControlCatalog;
use gapwise_cli::assess::{run_walk, Answers};
use gapwise_cli::submit::{submit_result, SubmissionTarget};
use gapwise_client::{ClientConfig, ClientError, SubmissionClient};
use gapwise_core::{AssessorId, ProjectId};
use gapwise_report::AssessmentResult;
use zeroize::Zeroizing;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn catalog() -> Arc<ControlCatalog> {
    Arc::new(ControlCatalog::ecc_default().unwrap())
}

/// Start the API on a random port. Returns the base URL and a shutdown
/// sender.
async fn start_server(state: AppState) -> (String, tokio::sync::oneshot::Sender<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind to random port");
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let app = gapwise_api::app(state);
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async {
                rx.await.ok();
            })
            .await
            .ok();
    });

    (format!("http://127.0.0.1:{port}"), tx)
}

fn sample_result() -> AssessmentResult {
    let answers = Answers::from_yaml_str(
        r#"
"1-1-1":
  status: compliant
  impact: high
  likelihood: low
"2-2-1":
  status: non-compliant
  impact: critical
  likelihood: high
  notes: No MFA on remote access
"#,
    )
    .unwrap();
    run_walk(catalog(), &answers).unwrap()
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[tokio::test]
async fn client_submission_is_stored_with_matching_digest() {
    let state = AppState::new(catalog());
    let (base, shutdown) = start_server(state.clone()).await;

    let client = SubmissionClient::new(ClientConfig::new(&base).unwrap()).unwrap();
    let result = sample_result();
    let assessor = AssessorId::new("ciso@example.com").unwrap();
    let project = ProjectId::new("hq-2024").unwrap();

    let receipt = client.submit(&assessor, &project, &result).await.unwrap();
    assert_eq!(receipt.assessor_id, "ciso@example.com");
    assert_eq!(receipt.project_id, "hq-2024");
    assert_eq!(receipt.result_digest, result.digest().unwrap());

    let stored = state.submissions.get(&receipt.id).expect("stored in memory");
    assert_eq!(stored.result, result);

    shutdown.send(()).ok();
}

#[tokio::test]
async fn resubmission_creates_a_second_record() {
    let state = AppState::new(catalog());
    let (base, shutdown) = start_server(state.clone()).await;

    let client = SubmissionClient::new(ClientConfig::new(&base).unwrap()).unwrap();
    let result = sample_result();
    let assessor = AssessorId::new("auditor").unwrap();
    let project = ProjectId::new("p1").unwrap();

    let a = client.submit(&assessor, &project, &result).await.unwrap();
    let b = client.submit(&assessor, &project, &result).await.unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(a.result_digest, b.result_digest);
    assert_eq!(state.submissions.len(), 2);

    shutdown.send(()).ok();
}

#[tokio::test]
async fn missing_token_is_rejected_by_protected_service() {
    let config = AppConfig {
        auth_token: Some(Zeroizing::new("s3cret".to_string())),
        ..AppConfig::default()
    };
    let state = AppState::with_config(config, catalog(), None);
    let (base, shutdown) = start_server(state.clone()).await;

    let result = sample_result();
    let assessor = AssessorId::new("auditor").unwrap();
    let project = ProjectId::new("p1").unwrap();

    let anonymous = SubmissionClient::new(ClientConfig::new(&base).unwrap()).unwrap();
    match anonymous.submit(&assessor, &project, &result).await {
        Err(ClientError::Api { status, .. }) => assert_eq!(status, 401),
        other => panic!("expected 401, got {other:?}"),
    }
    assert!(state.submissions.is_empty());

    let authorised =
        SubmissionClient::new(ClientConfig::new(&base).unwrap().with_token("s3cret")).unwrap();
    authorised.submit(&assessor, &project, &result).await.unwrap();
    assert_eq!(state.submissions.len(), 1);

    shutdown.send(()).ok();
}

// ---------------------------------------------------------------------------
// CLI submission path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cli_submit_reaches_service() {
    let state = AppState::new(catalog());
    let (base, shutdown) = start_server(state.clone()).await;

    let target = SubmissionTarget {
        assessor: Some("cli-user".into()),
        project: Some("cli-project".into()),
        api_url: Some(base),
    };
    let result = sample_result();
    let expected_digest = result.digest().unwrap();

    // The CLI runs its own runtime, so it must not block this one.
    let receipt = tokio::task::spawn_blocking(move || submit_result(&target, &result))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(receipt.result_digest, expected_digest);
    assert_eq!(state.submissions.len(), 1);

    shutdown.send(()).ok();
}

#[tokio::test]
async fn cli_reports_transport_failure() {
    let target = SubmissionTarget {
        assessor: Some("cli-user".into()),
        project: Some("cli-project".into()),
        api_url: Some("http://127.0.0.1:1".into()),
    };
    let result = sample_result();
    let outcome = tokio::task::spawn_blocking(move || submit_result(&target, &result))
        .await
        .unwrap();
    assert!(outcome.is_err());
}
