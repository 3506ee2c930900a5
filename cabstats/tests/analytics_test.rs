//! Tests for the analytics service client.
//!
//! Each test starts a stand-in `/analytics/service` endpoint on a random port
//! that records what it was sent and answers with a canned status and body.

use axum::extract::{Form, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use cabstats::config::AnalyticsConfig;
use cabstats::executor::{AnalyticsClient, PeriodSeries, QueryExecutor};
use cabstats::Error;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Received {
    authorization: Option<String>,
    form: HashMap<String, String>,
}

#[derive(Clone)]
struct ServiceState {
    status: StatusCode,
    content_type: &'static str,
    body: &'static str,
    received: Arc<Mutex<Received>>,
}

async fn service(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    {
        let mut received = state.received.lock().unwrap();
        received.authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        received.form = form;
    }
    (
        state.status,
        [(header::CONTENT_TYPE, state.content_type)],
        state.body,
    )
        .into_response()
}

/// Start the stand-in service and return a client pointed at it.
async fn start_service(
    status: StatusCode,
    content_type: &'static str,
    body: &'static str,
) -> (AnalyticsClient, Arc<Mutex<Received>>) {
    let received = Arc::new(Mutex::new(Received::default()));
    let state = ServiceState {
        status,
        content_type,
        body,
        received: received.clone(),
    };
    let router = Router::new()
        .route("/analytics/service", post(service))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let config = AnalyticsConfig {
        endpoint: format!("http://{}/", addr),
        request_timeout_ms: 5_000,
        ..Default::default()
    };
    (AnalyticsClient::new(&config).unwrap(), received)
}

fn executor_message(err: Error) -> String {
    match err {
        Error::Executor(msg) => msg,
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_successful_query() {
    let (client, received) = start_service(
        StatusCode::OK,
        "application/json",
        r#"{"results":[{"period":1,"aggregate":2},"stray"],"status":"success"}"#,
    )
    .await;

    let results = client.execute("SELECT 1;").await.unwrap();
    let series = PeriodSeries::collect(results).unwrap();
    assert_eq!(
        series,
        PeriodSeries {
            periods: vec![1.0],
            aggregates: vec![2.0],
        }
    );

    let received = received.lock().unwrap();
    assert_eq!(
        received.authorization.as_deref(),
        Some("Basic dXNlcjpwYXNzd29yZA==")
    );
    assert_eq!(received.form.get("statement").map(String::as_str), Some("SELECT 1;"));
}

#[tokio::test]
async fn test_reported_errors_fail_on_close() {
    let (client, _received) = start_service(
        StatusCode::OK,
        "application/json",
        r#"{"results":[],"status":"errors","errors":[{"code":1,"msg":"x"}]}"#,
    )
    .await;

    let results = client.execute("SELECT 1;").await.unwrap();
    let err = PeriodSeries::collect(results).unwrap_err();
    assert_eq!(err.to_string(), "Executor error: 1: x");
    assert_eq!(err.kind(), "executor_failure");
}

#[tokio::test]
async fn test_unsuccessful_status_fails_on_close() {
    let (client, _received) = start_service(
        StatusCode::OK,
        "application/json",
        r#"{"results":[{"period":1,"aggregate":2}],"status":"timeout"}"#,
    )
    .await;

    let results = client.execute("SELECT 1;").await.unwrap();
    let msg = executor_message(results.close().unwrap_err());
    assert!(msg.contains("timeout"), "{msg}");
}

#[tokio::test]
async fn test_error_status_with_json_errors() {
    let (client, _received) = start_service(
        StatusCode::BAD_REQUEST,
        "application/json",
        r#"{"errors":[{"code":24045,"msg":"no dataset"}],"status":"fatal"}"#,
    )
    .await;

    let err = client.execute("SELECT 1;").await.unwrap_err();
    assert_eq!(
        executor_message(err),
        "analytics query failed: 24045: no dataset"
    );
}

#[tokio::test]
async fn test_error_status_with_plain_body() {
    let (client, _received) =
        start_service(StatusCode::UNAUTHORIZED, "text/plain", "Unauthorized").await;

    let err = client.execute("SELECT 1;").await.unwrap_err();
    assert_eq!(
        executor_message(err),
        "unreadable response (401 Unauthorized): Unauthorized"
    );
}
