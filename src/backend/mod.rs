//! Generation backends hidden behind a single capability trait.

pub mod gemini;
pub mod local;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    config::{BackendConfig, Mode},
    error::SummarizerResult,
};

pub use gemini::GeminiBackend;
pub use local::LocalBackend;

/// Sampling options forwarded to every generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Sampling randomness, 0 is deterministic.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
    /// Sampling seed, honoured by backends that support one.
    pub seed: Option<u64>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_output_tokens: 256,
            seed: Some(42),
        }
    }
}

/// Text generation capability shared by the remote and local variants.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Short backend name used in logs and errors.
    fn name(&self) -> &'static str;

    /// Model identifier the backend invokes.
    fn model(&self) -> &str;

    /// Generate a continuation for `prompt`.
    async fn generate(&self, prompt: &str, options: &GenerationOptions)
        -> SummarizerResult<String>;
}

/// Build the backend selected by `config.mode`. Fails fast on missing configuration.
pub async fn from_config(config: &BackendConfig) -> SummarizerResult<Box<dyn GenerationBackend>> {
    let backend: Box<dyn GenerationBackend> = match config.mode {
        Mode::Gemini => Box::new(GeminiBackend::new(config)?),
        Mode::Local => Box::new(LocalBackend::connect(config).await?),
    };
    info!(
        backend = backend.name(),
        model = backend.model(),
        "generation backend ready"
    );
    Ok(backend)
}
