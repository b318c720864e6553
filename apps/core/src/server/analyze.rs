use axum::extract::{Query, State};
use axum::Json;
use std::sync::Arc;

use crate::brain::IntentAnalysis;
use crate::models::AnalyzeQuery;
use crate::server::AppState;

/// Handler for `GET /api/analyze?message=...`.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AnalyzeQuery>,
) -> Json<IntentAnalysis> {
    Json(state.classifier.analyze(&query.message))
}
