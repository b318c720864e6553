use crate::actors::llm::ModelState;
use crate::actors::messages::{AppError, Generation, GenerationParams};
use async_trait::async_trait;

/// Defines the public interface for an LLM (Large Language Model) actor.
///
/// This trait abstracts the specific implementation of the LLM, allowing for different
/// backends (e.g., local llama.cpp, test doubles) to be injected interchangeably.
#[async_trait]
pub trait LlmActor: Send + Sync + 'static {
    /// Generates a complete text response for a prompt.
    async fn generate(&self, prompt: String, params: GenerationParams) -> Result<Generation, AppError>;

    /// Current lifecycle state of the model collaborator.
    fn state(&self) -> ModelState;
}

/// Defines the public interface for an OCR provider.
///
/// Implementations receive raw image bytes and return the provider's JSON result untouched.
#[async_trait]
pub trait OcrProvider: Send + Sync + 'static {
    /// Recognizes text and math in an image.
    async fn recognize(&self, image: Vec<u8>) -> Result<serde_json::Value, AppError>;

    /// Whether credentials are present.
    fn is_configured(&self) -> bool;
}
