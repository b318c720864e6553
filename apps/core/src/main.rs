// Whiteboard Tutor Backend Entry Point
// Classifies tutoring messages, forwards them to the local model and decorates replies

mod actors;
mod brain;
mod config;
mod error;
mod logging;
mod models;
mod ocr;
mod rate_limiter;
mod server;

#[cfg(test)]
mod tests;

use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use actors::llm::{LlmActorHandle, ModelState};
use config::Config;
use ocr::MathpixClient;
use server::AppState;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init_tracing(&config.log_level, config.log_format);

    info!("Whiteboard Tutor starting...");

    let llm = LlmActorHandle::spawn(config.llm_settings()?);
    let ocr = MathpixClient::new(
        config.mathpix_endpoint.clone(),
        config.mathpix_app_id.clone(),
        config.mathpix_app_key.clone(),
    );

    // Traffic is only accepted once the model has loaded or failed
    match llm.wait_until_settled().await {
        ModelState::Ready => info!("Model server ready at {}", config.model_server_url),
        state => warn!(
            "Model server is {}; chat requests will be refused until restart",
            state.label()
        ),
    }

    let state = Arc::new(AppState::new(Arc::new(llm.clone()), Arc::new(ocr), &config));
    let router = server::build_router(state, &config.cors_origins);
    if config.cors_allows_any() {
        info!("CORS: any origin allowed");
    }

    let listener = TcpListener::bind(config.listen_address()).await?;
    server::serve(listener, router, shutdown_signal()).await?;

    if let Err(e) = llm.shutdown().await {
        warn!("Model service did not shut down cleanly: {}", e);
    }
    info!("Whiteboard Tutor stopped");

    Ok(())
}
