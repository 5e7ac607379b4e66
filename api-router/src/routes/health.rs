use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::api_state::ApiState;

/// Liveness probe: the process is up and serving HTTP.
pub async fn live() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Readiness probe. The index is complete before the listener binds, so
/// reaching this handler means the service is ready.
pub async fn ready(State(state): State<ApiState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "checks": { "index": "ok" },
            "entries": state.index.len(),
            "dimension": state.index.dimension(),
            "embedding_backend": state.embedding_backend,
        })),
    )
}
