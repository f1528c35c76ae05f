//! HTTP behavior of the API client, the backup loader and the reconciler
//! against a local mock server.

use std::sync::Arc;
use std::time::Duration;

use folio::backup::{BackupLoader, BackupLocation, BackupSource};
use folio::client::{ApiClient, RemoteSource, PROFILE_PATH, PROJECTS_PATH, SKILLS_PATH};
use folio::config::Config;
use folio::error::ApiError;
use folio::reconcile::{Reconciler, RetryPolicy};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn mount_json(server: &MockServer, at: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sends_api_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .and(header("authorization", "Api-Key s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Sam"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), Some("s3cret".into()), TIMEOUT).unwrap();
    let profile = client.profile().await.unwrap();
    assert_eq!(profile.name.as_deref(), Some("Sam"));
}

#[tokio::test]
async fn test_missing_key_sends_no_header() {
    let server = MockServer::start().await;
    mount_json(&server, PROFILE_PATH, json!({"name": "Sam"})).await;

    let client = ApiClient::new(&server.uri(), None, TIMEOUT).unwrap();
    client.profile().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_non_2xx_is_status_error() {
    let server = MockServer::start().await;

    let client = ApiClient::new(&server.uri(), None, TIMEOUT).unwrap();
    let err = client.skills().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
    assert_eq!(err.to_string(), "HTTP Error: 404 Not Found");
}

#[tokio::test]
async fn test_bad_json_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROJECTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), None, TIMEOUT).unwrap();
    assert!(matches!(client.projects().await, Err(ApiError::Decode { .. })));
}

#[tokio::test]
async fn test_slow_endpoint_is_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PROFILE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), None, Duration::from_millis(100)).unwrap();
    let err = client.profile().await.unwrap_err();
    assert!(err.is_timeout());
    assert!(matches!(err, ApiError::Transport { .. }));

    let not_found = client.skills().await.unwrap_err();
    assert!(!not_found.is_timeout());
}

#[tokio::test]
async fn test_fetch_all_keeps_partial_results() {
    let server = MockServer::start().await;
    mount_json(&server, SKILLS_PATH, json!([{"name": "Rust", "category": "BE", "proficiency": 9}])).await;

    let client = ApiClient::new(&server.uri(), None, TIMEOUT).unwrap();
    let bundle = client.fetch_all().await;

    assert!(bundle.any_success());
    assert_eq!(bundle.failures().len(), 4);
    let docs = bundle.into_documents();
    assert_eq!(docs.skills.len(), 1);
    assert!(docs.projects.is_empty());
}

#[tokio::test]
async fn test_single_item_lookups() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/me/projects/chat-app/", json!({"title": "Chat App", "slug": "chat-app"})).await;

    let client = ApiClient::new(&format!("{}/", server.uri()), None, TIMEOUT).unwrap();
    let project = client.project("chat-app").await.unwrap();
    assert_eq!(project.title, "Chat App");
}

#[tokio::test]
async fn test_backup_loads_from_site_origin() {
    let server = MockServer::start().await;
    mount_json(&server, "/profile.json", json!({"profile": {"name": "Backup"}, "projects": []})).await;

    let cfg = Config {
        site_url: Some(server.uri()),
        ..Default::default()
    };
    let loader = BackupLoader::from_config(&cfg).unwrap();
    assert_eq!(loader.location(), &BackupLocation::Url(format!("{}/profile.json", server.uri())));

    let doc = loader.load().await.unwrap();
    assert_eq!(doc.profile.unwrap().name.as_deref(), Some("Backup"));
}

#[tokio::test]
async fn test_reconciler_end_to_end() {
    let server = MockServer::start().await;
    mount_json(&server, "/profile.json", json!({"profile": {"name": "Backup"}})).await;
    mount_json(&server, PROFILE_PATH, json!({"name": "Live", "tagline": "Platform Engineer"})).await;

    let cfg = Config {
        site_url: Some(server.uri()),
        ..Default::default()
    };
    let snapshot = Reconciler::from_config(&cfg).unwrap().spawn().settle().await;

    assert!(snapshot.is_using_api());
    assert_eq!(snapshot.error, None);
    let content = snapshot.content().unwrap();
    assert_eq!(content.profile.name, "Live");
    assert_eq!(content.profile.title, "Platform Engineer");
}

#[tokio::test]
async fn test_reconciler_falls_back_when_everything_is_down() {
    let server = MockServer::start().await;

    let cfg = Config {
        site_url: Some(server.uri()),
        ..Default::default()
    };
    let policy = RetryPolicy {
        max_retries: 1,
        base_delay: Duration::from_millis(10),
    };
    let remote = Arc::new(ApiClient::from_config(&cfg).unwrap());
    let backup = Arc::new(BackupLoader::from_config(&cfg).unwrap());
    let snapshot = Reconciler::new(remote, backup).with_policy(policy).spawn().settle().await;

    assert_eq!(snapshot.source_label(), "fallback");
    assert_eq!(snapshot.error.as_deref(), Some("HTTP Error: 404 Not Found"));

    // two attempts of five requests, plus the backup document
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 11);
}
