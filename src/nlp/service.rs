//! Mode-dispatching summarization service.

use tracing::{debug, info, instrument, warn};

use crate::{
    backend::{self, GenerationBackend, GenerationOptions},
    config::{BackendConfig, Mode},
    error::SummarizerResult,
};

use super::prompt;

/// Returned instead of an error when the caller submits blank text.
pub const EMPTY_INPUT_SENTINEL: &str = "Error: Empty input text.";

/// Summarizes clinical notes with a backend chosen once at construction.
pub struct SummarizerService {
    mode: Mode,
    backend: Box<dyn GenerationBackend>,
    options: GenerationOptions,
}

impl SummarizerService {
    /// Build the backend described by `config`. Missing credentials or models fail here.
    pub async fn from_config(config: &BackendConfig) -> SummarizerResult<Self> {
        let backend = backend::from_config(config).await?;
        Ok(Self::with_backend(config.mode, backend, config.options))
    }

    /// Wrap an already constructed backend.
    pub fn with_backend(
        mode: Mode,
        backend: Box<dyn GenerationBackend>,
        options: GenerationOptions,
    ) -> Self {
        Self {
            mode,
            backend,
            options,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// Summarize one note. Blank input yields [`EMPTY_INPUT_SENTINEL`] without a backend call.
    #[instrument(skip_all, fields(mode = %self.mode, chars = text.len()))]
    pub async fn summarize(&self, text: &str) -> SummarizerResult<String> {
        if text.trim().is_empty() {
            warn!("empty input text");
            return Ok(EMPTY_INPUT_SENTINEL.to_string());
        }
        let prompt = prompt::build(text);
        let summary = self.generate(&prompt).await?;
        debug!(summary_chars = summary.len(), "summary generated");
        Ok(summary)
    }

    /// Summarize notes one after another, in input order.
    ///
    /// The first backend failure aborts the batch; no partial results are returned.
    #[instrument(skip_all, fields(mode = %self.mode, items = texts.len()))]
    pub async fn batch_summarize<S: AsRef<str>>(&self, texts: &[S]) -> SummarizerResult<Vec<String>> {
        let mut summaries = Vec::with_capacity(texts.len());
        for (idx, text) in texts.iter().enumerate() {
            debug!(idx, "summarizing batch item");
            summaries.push(self.summarize(text.as_ref()).await?);
        }
        info!(count = summaries.len(), "batch summarized");
        Ok(summaries)
    }

    /// Run an already assembled prompt through the backend.
    pub async fn generate(&self, prompt: &str) -> SummarizerResult<String> {
        let raw = self.backend.generate(prompt, &self.options).await?;
        Ok(raw.trim().to_string())
    }
}
