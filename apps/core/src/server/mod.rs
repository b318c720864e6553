//! HTTP surface.
//!
//! - `chat`: `/v1/chat/completions` and `/generate`
//! - `analyze`: `/api/analyze`
//! - `ocr`: `/api/ocr`
//! - `health`: `/health` and `/`
//! - `fallback`: filler replies for empty generations

pub mod analyze;
pub mod chat;
pub mod fallback;
pub mod health;
pub mod ocr;

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::actors::messages::GenerationParams;
use crate::actors::traits::{LlmActor, OcrProvider};
use crate::brain::{PromptComposer, WhiteboardClassifier};
use crate::config::Config;
use crate::error::AppError;
use crate::rate_limiter::RateLimiter;

const RATE_WINDOW: Duration = Duration::from_secs(60);
/// Idle clients are pruned once a bucket tracks more than this many.
const PRUNE_THRESHOLD: usize = 1024;

/// Bounds applied to chat generation parameters.
#[derive(Debug, Clone, Copy)]
pub struct GenerationLimits {
    pub max_tokens_ceiling: u32,
    pub temperature_floor: f32,
}

impl GenerationLimits {
    pub fn clamp(&self, max_tokens: u32, temperature: f32) -> GenerationParams {
        GenerationParams {
            max_new_tokens: max_tokens.min(self.max_tokens_ceiling),
            temperature: temperature.max(self.temperature_floor),
        }
    }
}

/// Shared application state for API handlers.
pub struct AppState {
    pub llm: Arc<dyn LlmActor>,
    pub ocr: Arc<dyn OcrProvider>,
    pub classifier: WhiteboardClassifier,
    pub composer: PromptComposer,
    pub limits: GenerationLimits,
    pub chat_limiter: Mutex<RateLimiter>,
    pub ocr_limiter: Mutex<RateLimiter>,
}

impl AppState {
    pub fn new(llm: Arc<dyn LlmActor>, ocr: Arc<dyn OcrProvider>, config: &Config) -> Self {
        Self {
            llm,
            ocr,
            classifier: WhiteboardClassifier::new(),
            composer: PromptComposer::new(),
            limits: GenerationLimits {
                max_tokens_ceiling: config.max_tokens_ceiling,
                temperature_floor: config.temperature_floor,
            },
            chat_limiter: Mutex::new(RateLimiter::new(config.chat_rate_limit, RATE_WINDOW)),
            ocr_limiter: Mutex::new(RateLimiter::new(config.ocr_rate_limit, RATE_WINDOW)),
        }
    }

    /// Records a request against a rate-limit bucket.
    pub fn check_rate(&self, bucket: &Mutex<RateLimiter>, client: &str) -> Result<(), AppError> {
        let mut limiter = bucket
            .lock()
            .map_err(|_| AppError::Internal("rate limiter lock poisoned".to_string()))?;

        if limiter.tracked_clients() > PRUNE_THRESHOLD {
            limiter.prune();
        }

        limiter.check(client).map_err(|retry_after| {
            warn!(client, "Rate limit exceeded");
            AppError::RateLimited { retry_after }
        })
    }
}

/// Identifies the caller for rate limiting: first `x-forwarded-for` hop, then the
/// peer address, then `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ClientId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(ip) = forwarded {
            return Ok(ClientId(ip.to_string()));
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(ClientId(peer.unwrap_or_else(|| "unknown".to_string())))
    }
}

/// `Json` body extractor whose rejections use the API error envelope.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => {
                let rejection: JsonRejection = rejection;
                warn!("Rejected request body: {}", rejection.body_text());
                Err(AppError::Validation(rejection.body_text()))
            }
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Build the Axum router with all API routes.
pub fn build_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/v1/chat/completions", post(chat::chat_completions))
        .route("/generate", post(chat::generate))
        .route("/api/analyze", get(analyze::analyze))
        .route("/api/ocr", post(ocr::recognize))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Serves the router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!(addr = ?listener.local_addr().ok(), "HTTP API listening");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;

    Ok(())
}
