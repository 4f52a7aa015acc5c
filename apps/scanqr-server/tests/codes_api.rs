//! Drives the server through the remote backend, end to end over HTTP.

use std::sync::Arc;

use scanqr_core::{StoreBackend, StoreError};
use scanqr_db::{KeyValueBackend, MemoryStorage};
use scanqr_remote::{RemoteBackend, RemoteConfig};
use scanqr_server::config::ServerBackend;
use scanqr_server::{open_backend, router, AppState};

async fn spawn_server() -> String {
    serve(Arc::new(KeyValueBackend::new(MemoryStorage::new()))).await
}

async fn serve(backend: Arc<dyn StoreBackend>) -> String {
    let app = router(AppState::new(backend));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn client() -> RemoteBackend {
    let base = spawn_server().await;
    RemoteBackend::new(&RemoteConfig::new(base)).unwrap()
}

#[tokio::test]
async fn test_create_then_list() {
    let remote = client().await;

    let created = remote.create("ABC123", "qr").await.unwrap();
    let listed = remote.list().await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, created.id);
    assert_eq!(listed[0].data, "ABC123");
    assert_eq!(listed[0].code_type, "qr");
}

#[tokio::test]
async fn test_list_is_oldest_first_on_the_wire() {
    let remote = client().await;
    remote.create("first", "qr").await.unwrap();
    remote.create("second", "ean13").await.unwrap();

    let data: Vec<String> = remote.list().await.unwrap().into_iter().map(|r| r.data).collect();
    assert_eq!(data, vec!["first", "second"]);
}

#[tokio::test]
async fn test_get_and_delete_by_id() {
    let remote = client().await;
    let a = remote.create("a", "qr").await.unwrap();
    let b = remote.create("b", "qr").await.unwrap();

    assert_eq!(remote.get_by_id(&b.id).await.unwrap().data, "b");

    remote.delete_one(&a.id).await.unwrap();
    let ids: Vec<String> = remote.list().await.unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![b.id]);
}

#[tokio::test]
async fn test_missing_id_is_not_found() {
    let remote = client().await;
    remote.create("a", "qr").await.unwrap();

    assert!(matches!(
        remote.delete_one("1").await,
        Err(StoreError::NotFound { .. })
    ));
    assert!(matches!(
        remote.get_by_id("1").await,
        Err(StoreError::NotFound { .. })
    ));
    assert_eq!(remote.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_all_is_idempotent() {
    let remote = client().await;
    remote.create("a", "qr").await.unwrap();
    remote.create("b", "qr").await.unwrap();

    remote.delete_all().await.unwrap();
    remote.delete_all().await.unwrap();

    assert!(remote.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_health_reports_backend() {
    let base = spawn_server().await;

    let body: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "key_value");
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let base = spawn_server().await;

    let response = reqwest::Client::new()
        .post(format!("{}/codes", base))
        .header("content-type", "application/json")
        .body("[1, 2, 3]")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[tokio::test]
async fn test_wrong_content_type_gets_json_error() {
    let base = spawn_server().await;

    let response = reqwest::Client::new()
        .post(format!("{}/codes", base))
        .body(r#"{"data": "x", "type": "qr"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_concurrent_creates_on_file_backed_kv_server() {
    let dir = tempfile::tempdir().unwrap();
    let backend = open_backend(&ServerBackend::KeyValue {
        dir: dir.path().join("kv"),
    })
    .await
    .unwrap();
    let base = serve(backend).await;
    let remote = Arc::new(RemoteBackend::new(&RemoteConfig::new(base)).unwrap());

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let remote = remote.clone();
            tokio::spawn(async move { remote.create(&format!("code-{}", i), "qr").await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(remote.list().await.unwrap().len(), 20);
}
