use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::actors::llm::ModelState;
use crate::models::HealthResponse;
use crate::server::AppState;

/// Handler for `GET /health`.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let model_state = state.llm.state();
    let loaded = model_state == ModelState::Ready;

    Json(HealthResponse {
        status: if loaded { "healthy" } else { "unhealthy" }.to_string(),
        model_loaded: loaded,
        model_state: model_state.label().to_string(),
        ocr_configured: state.ocr.is_configured(),
    })
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Whiteboard Tutor Server is running!" }))
}
