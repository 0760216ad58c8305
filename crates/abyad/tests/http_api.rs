//! End-to-end API tests with a fake pipeline runner.
//!
//! The runner command just cats a captured transcript, so the full
//! create-session / analyze flow runs without any LLM or network.

use abyad::config::Config;
use abyad::server::{router, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceExt;

fn test_app(runner_cmd: Vec<String>) -> Router {
    let mut config = Config::default();
    config.runner.cmd = runner_cmd;
    config.runner.timeout_secs = 10;
    router(Arc::new(AppState::new(&config)))
}

fn transcript_file() -> tempfile::NamedTempFile {
    // Printed-literal event lines, the way deployment runs emit them
    let transcript = concat!(
        "Session ID: 5742146559624216576\n",
        "Sending course content for analysis...\n",
        "{'content': {'parts': [{'text': 'Category: Web3 Development and Design'}], 'role': 'model'}, 'author': 'course_categorizer', 'id': 'aQ19xu4c'}\n",
        "{'content': {'parts': [{'text': '```json\\n{\"final_score\": 86.5, \"passed\": true, \"category\": \"Web3 Development and Design\"}\\n```'}], 'role': 'model'}, 'author': 'score_calculator', 'id': 'cK30pl8s'}\n",
        "Analysis complete.\n",
    );
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(transcript.as_bytes()).unwrap();
    file
}

fn transcript_app() -> (Router, tempfile::NamedTempFile) {
    let file = transcript_file();
    let app = test_app(vec![
        "cat".to_string(),
        file.path().to_str().unwrap().to_string(),
    ]);
    (app, file)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create_session(app: &Router) -> String {
    let (status, body) = post_json(app, "/api/create-session", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_full_flow_create_session_then_analyze() {
    let (app, _file) = transcript_app();

    let session_id = create_session(&app).await;
    let (status, body) = post_json(
        &app,
        "/api/analyze",
        json!({"session_id": session_id, "content": "Week 1: intro to smart contracts..."}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["results"]["final_score"], json!(86.5));
    assert_eq!(body["results"]["passed"], json!(true));
    assert_eq!(
        body["results"]["category"],
        json!("Web3 Development and Design")
    );
}

#[tokio::test]
async fn test_analyze_with_missing_fields_is_rejected() {
    let (app, _file) = transcript_app();

    let (status, body) = post_json(&app, "/api/analyze", json!({"content": "text"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Missing session_id or content"));

    let (status, body) = post_json(&app, "/api/analyze", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));

    // Present but empty counts as missing
    let (status, _) = post_json(
        &app,
        "/api/analyze",
        json!({"session_id": "", "content": "text"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_with_unknown_session_is_rejected() {
    let (app, _file) = transcript_app();

    let (status, body) = post_json(
        &app,
        "/api/analyze",
        json!({"session_id": "not-a-session", "content": "text"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Invalid session_id"));
}

#[tokio::test]
async fn test_analyze_with_malformed_body_gets_the_error_envelope() {
    let (app, _file) = transcript_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Invalid request body"));
}

#[tokio::test]
async fn test_failing_runner_yields_generic_500() {
    let app = test_app(vec!["false".to_string()]);

    let session_id = create_session(&app).await;
    let (status, body) = post_json(
        &app,
        "/api/analyze",
        json!({"session_id": session_id, "content": "text"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["error"],
        json!("Failed to analyze course content using the deployed workflow")
    );
}

#[tokio::test]
async fn test_unconfigured_runner_yields_generic_500() {
    let app = test_app(Vec::new());

    let session_id = create_session(&app).await;
    let (status, body) = post_json(
        &app,
        "/api/analyze",
        json!({"session_id": session_id, "content": "text"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_health_reports_service_and_sessions() {
    let (app, _file) = transcript_app();

    let (status, body) = get_json(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["service"], json!("ABYA Course Reviewer"));
    assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
    assert_eq!(body["active_sessions"], json!(0));
    assert!(body["uptime_seconds"].is_u64());

    create_session(&app).await;
    let (_, body) = get_json(&app, "/api/health").await;
    assert_eq!(body["active_sessions"], json!(1));
}

#[tokio::test]
async fn test_sessions_endpoint_lists_created_sessions() {
    let (app, _file) = transcript_app();

    let first = create_session(&app).await;
    let second = create_session(&app).await;

    let (status, body) = get_json(&app, "/api/sessions").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    let ids: Vec<&str> = sessions
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&first.as_str()));
    assert!(ids.contains(&second.as_str()));
    for session in sessions {
        assert_eq!(session["status"], json!("active"));
        assert!(session["created_at"].is_string());
    }
}

#[tokio::test]
async fn test_same_session_analyzes_serialize() {
    let file = transcript_file();
    let app = test_app(vec![
        "sh".to_string(),
        "-c".to_string(),
        format!("sleep 0.3; cat {}", file.path().to_str().unwrap()),
    ]);

    let session_id = create_session(&app).await;
    let body = json!({"session_id": session_id, "content": "text"});

    let started = Instant::now();
    let (first, second) = tokio::join!(
        post_json(&app, "/api/analyze", body.clone()),
        post_json(&app, "/api/analyze", body.clone()),
    );
    let elapsed = started.elapsed();

    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(second.0, StatusCode::OK);
    // Two runs of a 300ms pipeline on one session cannot overlap
    assert!(
        elapsed >= Duration::from_millis(600),
        "expected serialized runs, finished in {:?}",
        elapsed
    );
}
