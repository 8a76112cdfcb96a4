//! Error taxonomy shared by the summarization core.

use thiserror::Error;

/// Failures surfaced by backends and the summarizer service.
#[derive(Debug, Error)]
pub enum SummarizerError {
    /// Missing credentials or an unusable local model. Raised at construction, never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Empty or malformed caller input.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Any failure from the remote or local generation call.
    #[error("{backend} backend unavailable: {message}")]
    BackendUnavailable {
        backend: &'static str,
        message: String,
    },
}

impl SummarizerError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn unavailable(backend: &'static str, message: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            backend,
            message: message.into(),
        }
    }

    pub fn is_backend_failure(&self) -> bool {
        matches!(self, Self::BackendUnavailable { .. })
    }
}

pub type SummarizerResult<T> = Result<T, SummarizerError>;
