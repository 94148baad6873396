//! End-to-end waits against a local stand-in for the status API

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use bda_client::DataAutomationClient;
use bda_core::domain::job::JobHandle;
use bda_poller::{JobPoller, ManualClock, PollError, PollerConfig};
use serde_json::json;

/// Serves `replies` in order, repeating the last one
#[derive(Clone)]
struct Script {
    replies: Arc<Vec<(StatusCode, serde_json::Value)>>,
    hits: Arc<AtomicUsize>,
}

async fn status(State(script): State<Script>) -> Response {
    let hit = script.hits.fetch_add(1, Ordering::SeqCst);
    let (code, body) = script.replies[hit.min(script.replies.len() - 1)].clone();
    (code, Json(body)).into_response()
}

async fn serve(replies: Vec<(StatusCode, serde_json::Value)>) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let script = Script {
        replies: Arc::new(replies),
        hits: hits.clone(),
    };
    let router = Router::new()
        .route("/GetDataAutomationStatus", post(status))
        .with_state(script);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{}", addr), hits)
}

fn handle() -> JobHandle {
    JobHandle::new("arn:aws:bedrock:us-west-2:123:data-automation-invocation/job-1").unwrap()
}

#[tokio::test]
async fn test_waits_until_success_over_http() {
    let (url, hits) = serve(vec![
        (StatusCode::OK, json!({ "status": "Created" })),
        (StatusCode::OK, json!({ "status": "InProgress" })),
        (
            StatusCode::OK,
            json!({
                "status": "Success",
                "outputConfiguration": { "s3Uri": "s3://bucket/output/job_metadata.json" }
            }),
        ),
    ])
    .await;

    let clock = Arc::new(ManualClock::new());
    let poller = JobPoller::new(DataAutomationClient::new(url), PollerConfig::new())
        .with_clock(clock.clone());

    let result = poller.wait_for_completion(&handle()).await.unwrap();

    assert_eq!(result.polls, 3);
    assert_eq!(result.output_uri(), Some("s3://bucket/output/job_metadata.json"));
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert_eq!(clock.total_slept(), Duration::from_secs(10));
}

#[tokio::test]
async fn test_server_errors_are_retried_over_http() {
    let (url, hits) = serve(vec![
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "message": "boom" })),
        (StatusCode::OK, json!({ "status": "Success" })),
    ])
    .await;

    let poller = JobPoller::new(DataAutomationClient::new(url), PollerConfig::new())
        .with_clock(ManualClock::new());

    let result = poller.wait_for_completion(&handle()).await.unwrap();

    assert_eq!(result.polls, 1);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_job_failure_over_http() {
    let (url, _hits) = serve(vec![(
        StatusCode::OK,
        json!({
            "status": "ServiceError",
            "errorType": "InternalServerException",
            "errorMessage": "Processing failed"
        }),
    )])
    .await;

    let poller = JobPoller::new(DataAutomationClient::new(url), PollerConfig::new())
        .with_clock(ManualClock::new());

    let err = poller.wait_for_completion(&handle()).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        format!(
            "job {} failed with status ServiceError: InternalServerException: Processing failed",
            handle()
        )
    );
}

#[tokio::test]
async fn test_free_function_waits_with_real_clock() {
    let (url, hits) = serve(vec![
        (StatusCode::OK, json!({ "status": "InProgress" })),
        (StatusCode::OK, json!({ "status": "Success" })),
    ])
    .await;

    let result = bda_poller::wait_for_completion(
        DataAutomationClient::new(url),
        &handle(),
        Duration::from_millis(10),
        Some(Duration::from_secs(5)),
    )
    .await
    .unwrap();

    assert_eq!(result.status, "Success");
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_zero_interval_makes_no_request() {
    let (url, hits) = serve(vec![(StatusCode::OK, json!({ "status": "Success" }))]).await;

    let err = bda_poller::wait_for_completion(
        DataAutomationClient::new(url),
        &handle(),
        Duration::ZERO,
        None,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PollError::InvalidConfiguration(_)));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}
