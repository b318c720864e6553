//! # Brain Module
//!
//! Fast, non-LLM analysis of tutoring messages.
//! Runs BEFORE the model is called to decide which whiteboard and diagram
//! the reply should use, and AFTER to attach the whiteboard directive.
//!
//! ## Components
//! - `keywords`: static trigger tables (board type, diagrams, fallbacks)
//! - `intent`: whiteboard intent classification
//! - `prompt`: instruction templating for the model
//! - `augment`: reply augmentation with board sentence and directive tag
//! - `directive`: the `[TEACHER_BOARD: ...]` wire token

pub mod augment;
pub mod directive;
pub mod intent;
pub mod keywords;
pub mod prompt;

pub use augment::augment_response;
pub use directive::DirectiveTag;
pub use intent::{BoardType, DrawingType, IntentAnalysis, WhiteboardClassifier};
pub use prompt::PromptComposer;
