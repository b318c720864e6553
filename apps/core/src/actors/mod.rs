//! Actors owning the external collaborators.
//!
//! - `llm`: the model service (launch, readiness, generation, shutdown)
//! - `messages`: mailbox messages and actor errors
//! - `traits`: the injectable `LlmActor` / `OcrProvider` seams

pub mod llm;
pub mod messages;
pub mod traits;
