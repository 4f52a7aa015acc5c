//! # ScanQR Server
//!
//! HTTP service for the `/codes` contract, backed by a local store.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET    /codes        → 200 [CodeDto, ...]   oldest first               │
//! │  POST   /codes        → 201 CodeDto          body: {"data", "type"}     │
//! │  GET    /codes/{id}   → 200 CodeDto | 404                               │
//! │  DELETE /codes/{id}   → 204 | 404                                       │
//! │  GET    /health       → 200 {"status": "ok", "backend": "sqlite"}       │
//! │                                                                         │
//! │  Errors: {"error": "..."} with 400 / 404 / 422 / 503 / 500              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `SCANQR_SERVER_PORT` - HTTP port (default: 3000)
//! - `SCANQR_SERVER_BIND` - Interface (default: 0.0.0.0)
//! - `SCANQR_SERVER_BACKEND` - `sqlite` or `kv` (default: sqlite)
//! - `SCANQR_DB_PATH` - SQLite file (default: scanqr_server.db)
//! - `SCANQR_KV_DIR` - Key-value directory (default: scanqr_server_kv)

pub mod config;
pub mod error;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use scanqr_core::validation::validate_record_id;
use scanqr_core::{ListOrder, Record, StoreBackend, StoreError};
use scanqr_db::{DbConfig, FileStorage, KeyValueBackend, SqliteBackend};
use scanqr_remote::{CodeDto, CreateCodeRequest, CODES_PATH};
use serde_json::json;
use tracing::{debug, info};

use crate::config::ServerBackend;
use crate::error::ServerError;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub backend: Arc<dyn StoreBackend>,
}

impl AppState {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        AppState { backend }
    }
}

/// Opens the local backend the server persists to.
pub async fn open_backend(config: &ServerBackend) -> Result<Arc<dyn StoreBackend>, StoreError> {
    let backend: Arc<dyn StoreBackend> = match config {
        ServerBackend::Sqlite { path } => Arc::new(SqliteBackend::open(DbConfig::new(path)).await?),
        ServerBackend::KeyValue { dir } => {
            Arc::new(KeyValueBackend::new(FileStorage::open(dir).await?))
        }
    };
    info!(kind = %backend.kind(), "Server backend opened");
    Ok(backend)
}

/// Builds the router.
pub fn router(state: AppState) -> Router {
    let item_path = format!("{}/{{id}}", CODES_PATH);

    Router::new()
        .route(CODES_PATH, get(list_codes).post(create_code))
        .route(&item_path, get(get_code).delete(delete_code))
        .route("/health", get(health))
        .with_state(state)
}

/// Listing in insertion order, oldest first.
async fn ascending(backend: &dyn StoreBackend) -> Result<Vec<Record>, StoreError> {
    let mut records = backend.list().await?;
    if backend.native_order() == ListOrder::NewestFirst {
        records.reverse();
    }
    Ok(records)
}

async fn list_codes(State(state): State<AppState>) -> Result<Json<Vec<CodeDto>>, ServerError> {
    let records = ascending(state.backend.as_ref()).await?;
    debug!(count = records.len(), "Listing codes");
    Ok(Json(records.into_iter().map(CodeDto::from).collect()))
}

async fn create_code(
    State(state): State<AppState>,
    payload: Result<Json<CreateCodeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
    let Json(request) = payload?;
    let record = state
        .backend
        .create(&request.data, &request.code_type)
        .await?;
    info!(id = %record.id, code_type = %record.code_type, "Code created");
    Ok((StatusCode::CREATED, Json(CodeDto::from(record))))
}

async fn get_code(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CodeDto>, ServerError> {
    validate_record_id(&id).map_err(StoreError::from)?;

    let record = state
        .backend
        .list()
        .await?
        .into_iter()
        .find(|r| r.id == id)
        .ok_or_else(|| ServerError::NotFound(id))?;
    Ok(Json(CodeDto::from(record)))
}

async fn delete_code(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    validate_record_id(&id).map_err(StoreError::from)?;

    state.backend.delete_one(&id).await?;
    info!(id = %id, "Code deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "status": "ok", "backend": state.backend.kind().to_string() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanqr_db::MemoryStorage;

    fn state() -> AppState {
        AppState::new(Arc::new(KeyValueBackend::new(MemoryStorage::new())))
    }

    #[tokio::test]
    async fn test_ascending_reverses_newest_first_backends() {
        let state = state();
        state.backend.create("first", "qr").await.unwrap();
        state.backend.create("second", "qr").await.unwrap();

        let data: Vec<String> = ascending(state.backend.as_ref())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.data)
            .collect();
        assert_eq!(data, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_open_sqlite_backend() {
        let dir = tempfile::tempdir().unwrap();
        let backend = open_backend(&ServerBackend::Sqlite {
            path: dir.path().join("server.db"),
        })
        .await
        .unwrap();

        assert_eq!(backend.kind(), scanqr_core::BackendKind::Sqlite);
        backend.close().await.unwrap();
    }
}
