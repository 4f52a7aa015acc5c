//! # Remote Backend
//!
//! [`StoreBackend`] that forwards every operation to the `/codes` service.
//!
//! ## Operation Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create(data, type)  ──► POST   /codes        (server allocates id)    │
//! │  list()              ──► GET    /codes                                 │
//! │  get_by_id(id)       ──► GET    /codes/{id}                            │
//! │  delete_one(id)      ──► DELETE /codes/{id}   (404 → NotFound)         │
//! │  delete_all()        ──► GET /codes, then DELETE each id               │
//! │                          (404 during the sweep counts as deleted)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is cached locally. A failed call leaves no trace on the client
//! side, and retrying is up to the caller (see [`crate::retry`]).

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};
use scanqr_core::validation::validate_record_id;
use scanqr_core::{BackendKind, ListOrder, Record, StoreBackend, StoreResult};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::RemoteConfig;
use crate::error::{RemoteError, RemoteResult};
use crate::protocol::{CodeDto, CreateCodeRequest, CODES_PATH};

/// Scan record store backed by the remote HTTP service.
#[derive(Debug)]
pub struct RemoteBackend {
    client: Client,
    codes_url: Url,
    closed: AtomicBool,
}

impl RemoteBackend {
    /// Validates `config` and builds the HTTP client. No request is made.
    pub fn new(config: &RemoteConfig) -> RemoteResult<Self> {
        config.validate()?;

        let mut codes_url = config.parsed_base_url()?;
        codes_url
            .path_segments_mut()
            .map_err(|_| RemoteError::InvalidUrl(config.base_url.clone()))?
            .pop_if_empty()
            .push(CODES_PATH.trim_start_matches('/'));

        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;

        info!(url = %codes_url, "Remote backend configured");

        Ok(RemoteBackend {
            client,
            codes_url,
            closed: AtomicBool::new(false),
        })
    }

    /// Full URL of the collection endpoint.
    pub fn codes_url(&self) -> &Url {
        &self.codes_url
    }

    /// Fetches a single record.
    pub async fn get_by_id(&self, id: &str) -> StoreResult<Record> {
        self.ensure_open()?;
        let url = self.item_url(id)?;

        let response = self.client.get(url).send().await.map_err(RemoteError::from)?;
        let dto: CodeDto = expect_success(response, Some(id))
            .await?
            .json()
            .await
            .map_err(RemoteError::from)?;

        Ok(dto.into_record(Utc::now()))
    }

    fn ensure_open(&self) -> RemoteResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(RemoteError::Closed);
        }
        Ok(())
    }

    fn item_url(&self, id: &str) -> StoreResult<Url> {
        validate_record_id(id)?;

        let mut url = self.codes_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::InvalidUrl(self.codes_url.to_string()))?
            .push(id);
        Ok(url)
    }

    async fn delete_by_id(&self, id: &str) -> StoreResult<()> {
        let url = self.item_url(id)?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(RemoteError::from)?;
        expect_success(response, Some(id)).await?;
        Ok(())
    }
}

/// Passes 2xx responses through and turns everything else into an error.
async fn expect_success(response: Response, id: Option<&str>) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(RemoteError::NotFound { id: id.to_string() });
        }
    }

    let message = response
        .text()
        .await
        .unwrap_or_default()
        .chars()
        .take(200)
        .collect::<String>();

    Err(RemoteError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl StoreBackend for RemoteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    fn native_order(&self) -> ListOrder {
        ListOrder::InsertionAscending
    }

    async fn create(&self, data: &str, code_type: &str) -> StoreResult<Record> {
        self.ensure_open()?;

        let body = CreateCodeRequest {
            data: data.to_string(),
            code_type: code_type.to_string(),
        };

        let response = self
            .client
            .post(self.codes_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(RemoteError::from)?;
        let dto: CodeDto = expect_success(response, None)
            .await?
            .json()
            .await
            .map_err(RemoteError::from)?;

        debug!(id = %dto.id, "Remote created code");
        Ok(dto.into_record(Utc::now()))
    }

    async fn list(&self) -> StoreResult<Vec<Record>> {
        self.ensure_open()?;

        let response = self
            .client
            .get(self.codes_url.clone())
            .send()
            .await
            .map_err(RemoteError::from)?;
        let dtos: Vec<CodeDto> = expect_success(response, None)
            .await?
            .json()
            .await
            .map_err(RemoteError::from)?;

        let received_at = Utc::now();
        debug!(count = dtos.len(), "Remote listed codes");
        Ok(dtos.into_iter().map(|d| d.into_record(received_at)).collect())
    }

    async fn delete_all(&self) -> StoreResult<()> {
        let records = self.list().await?;
        let total = records.len();

        for record in records {
            match self.delete_by_id(&record.id).await {
                Ok(()) => {}
                Err(scanqr_core::StoreError::NotFound { id }) => {
                    warn!(id = %id, "Record vanished during delete_all sweep");
                }
                Err(e) => return Err(e),
            }
        }

        debug!(total, "Remote deleted all codes");
        Ok(())
    }

    async fn delete_one(&self, id: &str) -> StoreResult<()> {
        self.ensure_open()?;
        self.delete_by_id(id).await?;
        debug!(id = %id, "Remote deleted code");
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("Remote backend closed");
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, State};
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use scanqr_core::StoreError;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::net::TcpListener;

    #[derive(Default)]
    struct MockServer {
        codes: Mutex<Vec<CodeDto>>,
        next_id: Mutex<u64>,
    }

    type Shared = Arc<MockServer>;

    async fn list_codes(State(server): State<Shared>) -> Json<Vec<CodeDto>> {
        Json(server.codes.lock().unwrap().clone())
    }

    async fn create_code(
        State(server): State<Shared>,
        Json(req): Json<CreateCodeRequest>,
    ) -> (AxumStatus, Json<CodeDto>) {
        let mut next = server.next_id.lock().unwrap();
        *next += 1;
        // json-server style: numeric id, no timestamp
        let dto = CodeDto {
            id: next.to_string(),
            data: req.data,
            code_type: req.code_type,
            timestamp: None,
        };
        server.codes.lock().unwrap().push(dto.clone());
        (AxumStatus::CREATED, Json(dto))
    }

    async fn get_code(
        State(server): State<Shared>,
        Path(id): Path<String>,
    ) -> Result<Json<CodeDto>, AxumStatus> {
        server
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .map(Json)
            .ok_or(AxumStatus::NOT_FOUND)
    }

    async fn delete_code(State(server): State<Shared>, Path(id): Path<String>) -> AxumStatus {
        let mut codes = server.codes.lock().unwrap();
        let before = codes.len();
        codes.retain(|c| c.id != id);
        if codes.len() == before {
            AxumStatus::NOT_FOUND
        } else {
            AxumStatus::NO_CONTENT
        }
    }

    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    async fn spawn_mock() -> (RemoteBackend, Shared) {
        let server: Shared = Arc::new(MockServer::default());
        let app = Router::new()
            .route("/codes", get(list_codes).post(create_code))
            .route("/codes/{id}", get(get_code).delete(delete_code))
            .with_state(server.clone());

        let base = serve(app).await;
        let backend = RemoteBackend::new(&RemoteConfig::new(base)).unwrap();
        (backend, server)
    }

    #[test]
    fn test_codes_url_joins_base_path() {
        let backend = RemoteBackend::new(&RemoteConfig::new("http://localhost:3000")).unwrap();
        assert_eq!(backend.codes_url().as_str(), "http://localhost:3000/codes");

        let backend = RemoteBackend::new(&RemoteConfig::new("https://h.example/api/")).unwrap();
        assert_eq!(backend.codes_url().as_str(), "https://h.example/api/codes");
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(RemoteBackend::new(&RemoteConfig::new("ftp://h")).is_err());
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let (backend, _server) = spawn_mock().await;

        let created = backend.create("ABC123", "qr").await.unwrap();
        let listed = backend.list().await.unwrap();

        assert_eq!(created.id, "1");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].data, "ABC123");
        assert_eq!(listed[0].code_type, "qr");
    }

    #[tokio::test]
    async fn test_identical_data_gets_distinct_ids() {
        let (backend, _server) = spawn_mock().await;

        let a = backend.create("SAME", "qr").await.unwrap();
        let b = backend.create("SAME", "qr").await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(backend.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_and_delete_by_id() {
        let (backend, _server) = spawn_mock().await;
        let created = backend.create("X", "code128").await.unwrap();

        assert_eq!(backend.get_by_id(&created.id).await.unwrap().data, "X");

        backend.delete_one(&created.id).await.unwrap();
        assert!(matches!(
            backend.get_by_id(&created.id).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_not_found() {
        let (backend, _server) = spawn_mock().await;
        backend.create("keep", "qr").await.unwrap();

        let err = backend.delete_one("999").await.unwrap_err();

        assert!(matches!(err, StoreError::NotFound { ref id } if id == "999"));
        assert_eq!(backend.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_all_sweeps_and_is_idempotent() {
        let (backend, server) = spawn_mock().await;
        for data in ["a", "b", "c"] {
            backend.create(data, "qr").await.unwrap();
        }

        backend.delete_all().await.unwrap();
        backend.delete_all().await.unwrap();

        assert!(backend.list().await.unwrap().is_empty());
        assert!(server.codes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_transient_and_nothing_is_listed() {
        async fn slow_create(Json(_req): Json<CreateCodeRequest>) -> AxumStatus {
            tokio::time::sleep(Duration::from_secs(2)).await;
            AxumStatus::CREATED
        }
        async fn empty_list() -> Json<Vec<CodeDto>> {
            Json(Vec::new())
        }

        let app = Router::new().route("/codes", post(slow_create).get(empty_list));
        let base = serve(app).await;
        let config = RemoteConfig::new(base).timeout(Duration::from_millis(200));
        let backend = RemoteBackend::new(&config).unwrap();

        let err = backend.create("ABC123", "qr").await.unwrap_err();

        assert!(matches!(err, StoreError::TransientIo(_)), "got {err:?}");
        assert!(err.is_retryable());
        assert!(backend.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transient() {
        // bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = RemoteBackend::new(&RemoteConfig::new(format!("http://{}", addr))).unwrap();
        let err = backend.list().await.unwrap_err();

        assert!(matches!(err, StoreError::TransientIo(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_server_validation_error_is_rejected() {
        async fn reject() -> (AxumStatus, &'static str) {
            (AxumStatus::UNPROCESSABLE_ENTITY, "data too long")
        }
        let base = serve(Router::new().route("/codes", post(reject))).await;
        let backend = RemoteBackend::new(&RemoteConfig::new(base)).unwrap();

        let err = backend.create("x", "qr").await.unwrap_err();

        assert!(
            matches!(err, StoreError::Rejected { status: 422, ref message } if message == "data too long")
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_serialization_error() {
        async fn garbage() -> &'static str {
            "<html>not json</html>"
        }
        let base = serve(Router::new().route("/codes", get(garbage))).await;
        let backend = RemoteBackend::new(&RemoteConfig::new(base)).unwrap();

        assert!(matches!(
            backend.list().await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_closed_backend_makes_no_requests() {
        let (backend, server) = spawn_mock().await;
        backend.close().await.unwrap();

        assert!(matches!(
            backend.create("x", "qr").await,
            Err(StoreError::Closed)
        ));
        assert!(server.codes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_path_like_id_is_rejected_before_sending() {
        let (backend, _server) = spawn_mock().await;
        assert!(matches!(
            backend.delete_one("../admin").await,
            Err(StoreError::Validation(_))
        ));
    }
}
