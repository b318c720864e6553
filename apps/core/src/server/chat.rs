use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::actors::llm::ModelState;
use crate::actors::messages::GenerationParams;
use crate::brain::augment_response;
use crate::error::AppError;
use crate::models::{ChatCompletionRequest, ChatCompletionResponse, GenerateRequest, GenerateResponse, Usage};
use crate::server::fallback::ensure_reply;
use crate::server::{ApiJson, AppState, ClientId};

/// Handler for `POST /v1/chat/completions`.
///
/// Classifies the last message, asks the model with clamped parameters and
/// appends the whiteboard directive when a diagram was chosen.
#[instrument(skip_all, fields(client = %client.0, model = %req.model))]
pub async fn chat_completions(
    State(state): State<Arc<AppState>>,
    client: ClientId,
    ApiJson(req): ApiJson<ChatCompletionRequest>,
) -> Result<Json<ChatCompletionResponse>, AppError> {
    state.check_rate(&state.chat_limiter, &client.0)?;

    let model_state = state.llm.state();
    if model_state != ModelState::Ready {
        warn!("Chat refused, model state is {}", model_state.label());
        return Err(AppError::ModelUnavailable(format!("model is {}", model_state.label())));
    }

    let message = req.last_message().to_string();
    let analysis = state.classifier.analyze(&message);
    let prompt = state.composer.compose(&message, &analysis);
    let params = state.limits.clamp(req.max_tokens, req.temperature);

    info!(
        board = analysis.board_type.label(),
        drawing = analysis.drawing_type.map(|d| d.label()).unwrap_or("none"),
        "Generating tutor reply"
    );

    let generation = state.llm.generate(prompt, params).await.map_err(|e| {
        error!("Generation failed: {}", e);
        e
    })?;

    let reply = ensure_reply(&generation.text, &message);
    let content = augment_response(&reply, &analysis);

    Ok(Json(ChatCompletionResponse::assistant(
        req.model,
        content,
        Usage::new(generation.prompt_tokens, generation.completion_tokens),
    )))
}

/// Handler for `POST /generate`: the prompt goes to the model as is.
#[instrument(skip_all, fields(max_tokens = req.max_tokens))]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> Result<Response, AppError> {
    if let Err(errors) = req.validate() {
        warn!("Rejected generate request: {}", errors);
        let body = Json(json!({
            "error": {
                "message": format!("Validation errors: {}", errors),
                "type": "invalid_request_error",
            }
        }));
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, body).into_response());
    }

    let params = GenerationParams {
        max_new_tokens: req.max_tokens,
        temperature: req.temperature,
    };

    let generation = state.llm.generate(req.prompt, params).await.map_err(|e| {
        error!("Generation failed: {}", e);
        e
    })?;

    Ok(Json(GenerateResponse {
        response: generation.text.trim().to_string(),
    })
    .into_response())
}
