use crate::actors::messages::{ActorError, AppError, Generation, GenerationParams, LlmMessage};
use crate::actors::traits::LlmActor;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::timeout;
use tracing::{error, info, instrument, warn};

// --- Constants ---
const TOP_P: f32 = 0.9;
const REPEAT_PENALTY: f32 = 1.1;
/// Extra time the handle waits on top of the HTTP timeout before giving up on a reply.
const REPLY_GRACE: Duration = Duration::from_secs(5);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Lifecycle of the model collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelState {
    /// Launching and/or waiting for the server's health check
    Loading,
    /// Accepting generation requests
    Ready,
    /// Startup failed; requests are refused
    Failed,
    /// Shut down; requests are refused
    Stopped,
}

impl ModelState {
    pub fn label(&self) -> &'static str {
        match self {
            ModelState::Loading => "loading",
            ModelState::Ready => "ready",
            ModelState::Failed => "failed",
            ModelState::Stopped => "stopped",
        }
    }
}

/// How to launch `llama-server` when the service manages the process itself.
#[derive(Debug, Clone)]
pub struct LaunchSettings {
    /// Binary name or path, resolved through `PATH`
    pub binary: String,
    pub model_path: PathBuf,
    pub host: String,
    pub port: u16,
}

/// Everything the LLM actor needs to reach the completion server.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Base URL of a llama.cpp-compatible server, without trailing slash
    pub server_url: String,
    pub auth_token: Option<String>,
    /// `None` means the server is managed externally
    pub launch: Option<LaunchSettings>,
    pub startup_retries: u32,
    pub retry_interval: Duration,
    pub completion_timeout: Duration,
}

#[cfg(test)]
impl LlmSettings {
    /// Settings for an already-running server, with fast startup probing
    pub fn for_server(server_url: String) -> Self {
        Self {
            server_url,
            auth_token: None,
            launch: None,
            startup_retries: 2,
            retry_interval: Duration::from_millis(10),
            completion_timeout: Duration::from_secs(5),
        }
    }
}

/// Wraps a prompt in the instruction template the tutor model was tuned on.
pub fn instruction_prompt(prompt: &str) -> String {
    format!("### Instruction:\n{}\n\n### Response:\n", prompt)
}

/// A handle to the `LlmActor`.
///
/// This struct provides a public, cloneable interface for sending messages to the
/// running LLM actor and observing its lifecycle. It abstracts away the channels.
#[derive(Clone)]
pub struct LlmActorHandle {
    sender: mpsc::Sender<LlmMessage>,
    state: watch::Receiver<ModelState>,
    reply_timeout: Duration,
}

impl LlmActorHandle {
    /// Creates a new `LlmActor` and returns a handle to it.
    ///
    /// This will spawn the `LlmActorRunner` in a new Tokio task. The runner starts in
    /// [`ModelState::Loading`] and moves to `Ready` or `Failed` once startup settles.
    pub fn spawn(settings: LlmSettings) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let (state_tx, state_rx) = watch::channel(ModelState::Loading);
        let reply_timeout = settings.completion_timeout + REPLY_GRACE;

        let actor = LlmActorRunner::new(receiver, state_tx, settings);
        tokio::spawn(async move { actor.run().await });

        Self {
            sender,
            state: state_rx,
            reply_timeout,
        }
    }

    /// Waits until startup either succeeded or failed.
    pub async fn wait_until_settled(&self) -> ModelState {
        let mut state = self.state.clone();
        let settled = match state.wait_for(|s| *s != ModelState::Loading).await {
            Ok(settled) => *settled,
            Err(_) => ModelState::Stopped,
        };
        settled
    }

    /// Stops the actor (and any launched server process).
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(LlmMessage::Shutdown { responder: send })
            .await
            .map_err(|e| ActorError::ChannelClosed(e.to_string()))?;
        timeout(SHUTDOWN_TIMEOUT, recv)
            .await?
            .map_err(|e| ActorError::ChannelClosed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl LlmActor for LlmActorHandle {
    async fn generate(&self, prompt: String, params: GenerationParams) -> Result<Generation, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = LlmMessage::Generate {
            prompt,
            params,
            responder: send,
        };

        self.sender
            .send(msg)
            .await
            .map_err(|e| ActorError::ChannelClosed(e.to_string()))?;
        timeout(self.reply_timeout, recv)
            .await?
            .map_err(|e| ActorError::ChannelClosed(e.to_string()))?
    }

    fn state(&self) -> ModelState {
        *self.state.borrow()
    }
}

#[derive(Serialize)]
struct CompletionPayload<'a> {
    prompt: &'a str,
    n_predict: u32,
    temperature: f32,
    top_p: f32,
    repeat_penalty: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionReply {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tokens_evaluated: u32,
    #[serde(default)]
    tokens_predicted: u32,
}

// --- Actor Runner (Internal Logic) ---
struct LlmActorRunner {
    receiver: mpsc::Receiver<LlmMessage>,
    state: watch::Sender<ModelState>,
    settings: LlmSettings,
    child: Option<tokio::process::Child>,
    client: Client,
}

impl Drop for LlmActorRunner {
    fn drop(&mut self) {
        self.stop_child();
    }
}

impl LlmActorRunner {
    fn new(
        receiver: mpsc::Receiver<LlmMessage>,
        state: watch::Sender<ModelState>,
        settings: LlmSettings,
    ) -> Self {
        Self {
            receiver,
            state,
            settings,
            child: None,
            client: Client::new(),
        }
    }

    async fn run(mut self) {
        info!("LlmActor started");

        match self.start().await {
            Ok(()) => {
                self.state.send_replace(ModelState::Ready);
            }
            Err(e) => {
                error!("Failed to start model server: {}", e);
                self.stop_child();
                self.state.send_replace(ModelState::Failed);
            }
        }

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                LlmMessage::Generate {
                    prompt,
                    params,
                    responder,
                } => {
                    if responder.is_closed() {
                        warn!("Skipping generation, caller stopped waiting while queued");
                        continue;
                    }
                    let result = self.generate_completion(&prompt, params).await;
                    let _ = responder.send(result);
                }
                LlmMessage::Shutdown { responder } => {
                    info!("LlmActor shutting down...");
                    self.stop_child();
                    self.state.send_replace(ModelState::Stopped);
                    let _ = responder.send(());
                    break;
                }
            }
        }

        self.state.send_replace(ModelState::Stopped);
        info!("LlmActor stopped");
    }

    async fn start(&mut self) -> Result<(), AppError> {
        if let Some(launch) = self.settings.launch.clone() {
            self.launch_server(&launch)?;
        }
        self.wait_for_health().await
    }

    fn launch_server(&mut self, launch: &LaunchSettings) -> Result<(), AppError> {
        let binary = which::which(&launch.binary)?;
        info!("Starting {:?} with model: {:?}", binary, launch.model_path);

        let child = Command::new(binary)
            .arg("-m")
            .arg(&launch.model_path)
            .arg("--host")
            .arg(&launch.host)
            .arg("--port")
            .arg(launch.port.to_string())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        self.child = Some(child);
        Ok(())
    }

    fn stop_child(&mut self) {
        if let Some(mut child) = self.child.take() {
            // start_kill() is non-blocking, so it is usable from Drop
            match child.start_kill() {
                Ok(_) => info!("llama-server process termination initiated"),
                Err(e) => error!("Failed to kill llama-server process: {}", e),
            }
        }
    }

    async fn wait_for_health(&self) -> Result<(), AppError> {
        let retries = self.settings.startup_retries;
        let health_endpoint = format!("{}/health", self.settings.server_url);

        for attempt in 1..=retries {
            match self.client.get(&health_endpoint).send().await {
                Ok(response) if response.status().is_success() => {
                    info!("Model server is ready after {} attempts", attempt);
                    return Ok(());
                }
                Ok(response) => {
                    info!("Model server responded with status {} on attempt {}", response.status(), attempt);
                }
                Err(e) => {
                    info!("Health check attempt {} failed: {}", attempt, e);
                }
            }

            if attempt < retries {
                tokio::time::sleep(self.settings.retry_interval).await;
            }
        }

        Err(AppError::ModelUnavailable(format!(
            "model server at {} failed to become ready after {} attempts",
            self.settings.server_url, retries
        )))
    }

    fn build_request<T: Serialize>(&self, endpoint: &str, payload: &T) -> reqwest::RequestBuilder {
        let request = self
            .client
            .post(format!("{}/{}", self.settings.server_url, endpoint))
            .json(payload);

        match &self.settings.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn generate_completion(&self, prompt: &str, params: GenerationParams) -> Result<Generation, AppError> {
        let state = *self.state.borrow();
        if state != ModelState::Ready {
            warn!("Generation refused, model state is {}", state.label());
            return Err(AppError::ModelUnavailable(format!("model is {}", state.label())));
        }

        let templated = instruction_prompt(prompt);
        let payload = CompletionPayload {
            prompt: &templated,
            n_predict: params.max_new_tokens,
            temperature: params.temperature,
            top_p: TOP_P,
            repeat_penalty: REPEAT_PENALTY,
            stream: false,
        };

        info!(
            max_new_tokens = params.max_new_tokens,
            temperature = params.temperature,
            "LLM generating ({} prompt chars)",
            templated.len()
        );

        let request_future = self.build_request("completion", &payload).send();
        let res = timeout(self.settings.completion_timeout, request_future).await??;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ActorError::LlmError(format!(
                "Completion request failed with status {}: {}",
                status, body
            ))
            .into());
        }

        let reply: CompletionReply = res
            .json()
            .await
            .map_err(|e| ActorError::LlmError(e.to_string()))?;

        Ok(Generation {
            text: reply.content,
            prompt_tokens: reply.tokens_evaluated,
            completion_tokens: reply.tokens_predicted,
        })
    }
}
