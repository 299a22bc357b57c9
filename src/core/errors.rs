use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Request-level error taxonomy.
///
/// Upstream variants carry the collaborator's failure detail for the logs;
/// the HTTP response only ever exposes the taxonomy-level message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("corpus unavailable")]
    CorpusUnavailable,
    #[error("corpus integrity: {0}")]
    CorpusIntegrity(String),
    #[error("embedding upstream failure: {0}")]
    EmbeddingUpstream(String),
    #[error("generation upstream failure: {0}")]
    GenerationUpstream(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(err: E) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::CorpusUnavailable => {
                tracing::error!("{}", self);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Corpus unavailable".to_string(),
                )
            }
            ApiError::CorpusIntegrity(_) => {
                tracing::error!("{}", self);
                (StatusCode::BAD_GATEWAY, "Corpus refresh rejected".to_string())
            }
            ApiError::EmbeddingUpstream(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::BAD_GATEWAY,
                    "Embedding service failed".to_string(),
                )
            }
            ApiError::GenerationUpstream(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::BAD_GATEWAY,
                    "Generation service failed".to_string(),
                )
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
