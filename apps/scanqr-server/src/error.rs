//! Error types for the server.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use scanqr_core::StoreError;
use serde_json::json;

/// Server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ServerError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { id } => ServerError::NotFound(id),
            StoreError::Validation(e) => ServerError::InvalidRequest(e.to_string()),
            StoreError::Rejected { message, .. } => ServerError::Unprocessable(message),
            e @ (StoreError::Closed
            | StoreError::BackendUnavailable(_)
            | StoreError::TransientIo(_)) => ServerError::Unavailable(e.to_string()),
            e => {
                tracing::error!(error = %e, "Store operation failed");
                ServerError::Internal(e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_status_codes() {
        let cases = [
            (StoreError::not_found("1"), StatusCode::NOT_FOUND),
            (StoreError::Closed, StatusCode::SERVICE_UNAVAILABLE),
            (
                StoreError::BackendUnavailable("db".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                StoreError::Serialization("bad blob".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                StoreError::Rejected {
                    status: 422,
                    message: "no".into(),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ServerError::from(error).status(), expected);
        }
    }
}
