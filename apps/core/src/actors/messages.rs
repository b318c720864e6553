use tokio::sync::oneshot;

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Clone)]
pub enum ActorError {
    /// An error originating from the LLM actor.
    #[error("LLM request failed: {0}")]
    LlmError(String),
    /// The actor's mailbox or reply channel is gone.
    #[error("Actor channel closed: {0}")]
    ChannelClosed(String),
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Sampling parameters for a single generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Upper bound on generated tokens
    pub max_new_tokens: u32,
    pub temperature: f32,
}

/// Text produced by the model, with token accounting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Messages that can be sent to the `LlmActor`.
#[derive(Debug)]
pub enum LlmMessage {
    /// A request to generate a complete text response.
    Generate {
        prompt: String,
        params: GenerationParams,
        /// A channel to send the final result back.
        responder: oneshot::Sender<Result<Generation, AppError>>,
    },
    /// Stop the model server (if launched) and the actor loop.
    Shutdown {
        /// Acknowledged once the actor is stopped.
        responder: oneshot::Sender<()>,
    },
}
