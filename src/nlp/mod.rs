//! Prompt construction, the summarizer service and text post-processing.

pub mod prompt;
pub mod service;
pub mod text;

pub use service::{SummarizerService, EMPTY_INPUT_SENTINEL};
