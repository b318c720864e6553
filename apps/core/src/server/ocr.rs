use axum::extract::State;
use axum::Json;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, instrument};

use crate::error::AppError;
use crate::models::OcrRequest;
use crate::ocr::decode_image_payload;
use crate::server::{ApiJson, AppState, ClientId};

/// Handler for `POST /api/ocr`. Returns the provider's JSON untouched.
#[instrument(skip_all, fields(client = %client.0))]
pub async fn recognize(
    State(state): State<Arc<AppState>>,
    client: ClientId,
    ApiJson(req): ApiJson<OcrRequest>,
) -> Result<Json<Value>, AppError> {
    state.check_rate(&state.ocr_limiter, &client.0)?;

    let image = decode_image_payload(&req.image)?;
    let result = state.ocr.recognize(image).await.map_err(|e| {
        error!("OCR failed: {}", e);
        e
    })?;

    Ok(Json(result))
}
