//! ApiClient policy tests over an in-memory transport.

use std::sync::Arc;
use std::time::Duration;

use project_portal::http::{ApiClient, ApiError, CallOptions, X_REQUEST_ID};
use project_portal::project::{ProjectSubmission, Role, UserGroup};
use project_portal::signing::SigV4Signer;
use uuid::Uuid;

mod common;
use common::{capture_logs, client_with, FailingProvider, FakeTransport};
use tracing::Level;

const ENDPOINT: &str = "https://api.example.com/prod/api/create-project";

#[tokio::test]
async fn test_rejects_plain_http_before_any_work() {
    let transport = Arc::new(FakeTransport::json(200, r#"{"success":true}"#));
    // A failing provider proves signing was never attempted.
    let signer = Arc::new(SigV4Signer::new(Arc::new(FailingProvider), "us-east-1", "execute-api"));
    let client = ApiClient::new(signer, transport.clone());
    let (logs, _guard) = capture_logs();

    let err = client.get("http://insecure.example.com").await.unwrap_err();
    assert!(logs.contains(Level::ERROR, "Error making signed API request"));
    assert!(matches!(err, ApiError::Security(_)));
    assert!(err.to_string().contains("Only HTTPS endpoints are allowed"));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_invalid_endpoint() {
    let transport = Arc::new(FakeTransport::json(200, "{}"));
    let client = client_with(transport.clone());

    let err = client.get("not a url").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidEndpoint { .. }));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_mandatory_headers_and_signature() {
    let transport = Arc::new(FakeTransport::json(200, "{}"));
    let client = client_with(transport.clone());

    let options = CallOptions::get()
        .with_header("Content-Type", "text/plain")
        .with_header("X-Requested-With", "curl")
        .with_header("Accept", "application/json");
    client.call(ENDPOINT, options).await.unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    let request = &sent[0];

    assert_eq!(request.method(), "GET");
    assert_eq!(request.url(), ENDPOINT);
    assert_eq!(request.header("Content-Type"), Some("application/json"));
    assert_eq!(request.header("X-Requested-With"), Some("XMLHttpRequest"));
    assert_eq!(request.header("Accept"), Some("application/json"));
    assert!(request.header("x-amz-date").is_some());
    assert!(request
        .authorization()
        .starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
    assert!(request.authorization().contains("/us-east-1/execute-api/aws4_request"));

    let request_id = request.header(X_REQUEST_ID).unwrap();
    assert!(Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn test_method_defaults_to_get() {
    let transport = Arc::new(FakeTransport::json(200, "{}"));
    let client = client_with(transport.clone());

    client.call(ENDPOINT, CallOptions::default()).await.unwrap();
    assert_eq!(transport.sent()[0].method(), "GET");
    assert!(transport.sent()[0].body().is_none());
}

#[tokio::test]
async fn test_fresh_signature_per_call() {
    let transport = Arc::new(FakeTransport::json(200, "{}"));
    let client = client_with(transport.clone());

    client.get(ENDPOINT).await.unwrap();
    client.get(ENDPOINT).await.unwrap();

    let sent = transport.sent();
    assert_ne!(sent[0].header(X_REQUEST_ID), sent[1].header(X_REQUEST_ID));
}

#[tokio::test]
async fn test_csrf_header_when_configured() {
    let token = "a".repeat(40);
    let transport = Arc::new(FakeTransport::json(200, "{}"));
    let client = client_with(transport.clone()).with_csrf_token(Some(token.clone()));

    client.get(ENDPOINT).await.unwrap();
    assert_eq!(transport.sent()[0].header("X-CSRF-Token"), Some(token.as_str()));

    let transport = Arc::new(FakeTransport::json(200, "{}"));
    let client = client_with(transport.clone());
    client.get(ENDPOINT).await.unwrap();
    assert_eq!(transport.sent()[0].header("X-CSRF-Token"), None);
}

#[tokio::test]
async fn test_post_serializes_json() {
    let transport = Arc::new(FakeTransport::json(
        200,
        r#"{"success":true,"message":"Project created successfully"}"#,
    ));
    let client = client_with(transport.clone());

    let submission = ProjectSubmission {
        name: "test-project".into(),
        description: "Test description".into(),
        user_groups: vec![UserGroup::new("user@example.com", Role::Editor)],
    };
    let response = client.create_project(ENDPOINT, &submission).await.unwrap();
    assert!(response.success);
    assert_eq!(response.message, "Project created successfully");

    let sent = transport.sent();
    assert_eq!(sent[0].method(), "POST");
    let body: serde_json::Value = serde_json::from_slice(sent[0].body().unwrap()).unwrap();
    assert_eq!(body["appID"], "test-project");
    assert_eq!(body["userGroups"][0]["role"], "project-editor");
    assert!(sent[0].header("x-amz-content-sha256").is_some());
}

#[tokio::test]
async fn test_error_status_is_not_an_error() {
    let transport = Arc::new(FakeTransport::json(500, r#"{"success":false}"#));
    let client = client_with(transport);

    let response = client.get(ENDPOINT).await.unwrap();
    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn test_missing_nosniff_is_advisory() {
    let transport = Arc::new(FakeTransport::new(|_| {
        Ok(project_portal::http::ApiResponse::new(
            reqwest::StatusCode::OK,
            reqwest::header::HeaderMap::new(),
            b"{}".to_vec(),
        ))
    }));
    let client = client_with(transport);
    let (logs, _guard) = capture_logs();

    let response = client.get(ENDPOINT).await.unwrap();
    assert!(response.is_success());
    assert!(logs.contains(Level::WARN, "Missing X-Content-Type-Options header in response"));
    assert_eq!(logs.count("Error making signed API request"), 0);
}

#[tokio::test]
async fn test_nosniff_present_logs_nothing() {
    let transport = Arc::new(FakeTransport::json(200, "{}"));
    let client = client_with(transport);
    let (logs, _guard) = capture_logs();

    client.get(ENDPOINT).await.unwrap();
    assert_eq!(logs.count("Missing X-Content-Type-Options header in response"), 0);
}

#[tokio::test]
async fn test_signing_failure_propagates() {
    let transport = Arc::new(FakeTransport::json(200, "{}"));
    let signer = Arc::new(SigV4Signer::new(Arc::new(FailingProvider), "us-east-1", "execute-api"));
    let client = ApiClient::new(signer, transport.clone());

    let err = client.get(ENDPOINT).await.unwrap_err();
    assert!(matches!(err, ApiError::Signing(_)));
    assert!(err.to_string().contains("identity pool unavailable"));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_network_error_propagates() {
    let transport = Arc::new(FakeTransport::new(|_| {
        Err(ApiError::Network("connection reset by peer".into()))
    }));
    let client = client_with(transport);
    let (logs, _guard) = capture_logs();

    let err = client.get(ENDPOINT).await.unwrap_err();
    assert_eq!(err.kind(), "network");
    assert!(logs.contains(Level::ERROR, "Error making signed API request"));
    assert_eq!(
        err.user_message(),
        "Failed to connect to the server. Please check your connection and try again."
    );
}

#[tokio::test(start_paused = true)]
async fn test_timeout_after_deadline() {
    let transport = Arc::new(FakeTransport::json(200, "{}").with_delay(Duration::from_secs(60)));
    let client = client_with(transport.clone());
    assert_eq!(client.timeout(), Duration::from_millis(30_000));

    let err = client.get(ENDPOINT).await.unwrap_err();
    assert!(matches!(err, ApiError::Timeout(30_000)));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_response_just_inside_deadline() {
    let transport =
        Arc::new(FakeTransport::json(200, "{}").with_delay(Duration::from_millis(29_999)));
    let client = client_with(transport);

    assert!(client.get(ENDPOINT).await.is_ok());
}

#[tokio::test]
async fn test_health_decoding() {
    let transport = Arc::new(FakeTransport::json(
        200,
        r#"{"status":"healthy","timestamp":"2024-01-01T00:00:00Z","version":"1.0.0","environment":"production"}"#,
    ));
    let client = client_with(transport.clone());

    let health = client.health("https://api.example.com/prod/health").await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version.as_deref(), Some("1.0.0"));
    assert_eq!(transport.sent()[0].method(), "GET");
}

#[tokio::test]
async fn test_undecodable_body() {
    let transport = Arc::new(FakeTransport::json(502, "<html>Bad Gateway</html>"));
    let client = client_with(transport);

    let err = client.health("https://api.example.com/prod/health").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
}
