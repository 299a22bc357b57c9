use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

pub async fn corpus_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.corpus.snapshot().await {
        Ok(snapshot) => Json(json!({
            "loaded": true,
            "documents": snapshot.len(),
            "dimension": snapshot.dimension()
        })),
        Err(_) => Json(json!({
            "loaded": false,
            "documents": 0,
            "dimension": 0
        })),
    }
}

pub async fn corpus_refresh(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.corpus.refresh().await?;
    Ok(Json(json!({
        "documents": snapshot.len(),
        "dimension": snapshot.dimension()
    })))
}
