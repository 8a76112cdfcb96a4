//! Backend for a locally served model behind an Ollama-compatible HTTP endpoint.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::BackendConfig,
    error::{SummarizerError, SummarizerResult},
    nlp::text::strip_prompt_echo,
};

use super::{GenerationBackend, GenerationOptions};

const BACKEND: &str = "local";

pub struct LocalBackend {
    client: Client,
    base_url: Url,
    model: String,
}

impl LocalBackend {
    /// Validate the configuration without touching the network.
    pub fn new(config: &BackendConfig) -> SummarizerResult<Self> {
        let model = config.model_id.trim();
        if model.is_empty() {
            return Err(SummarizerError::configuration(
                "local model identifier is empty; set LOCAL_MODEL_PATH",
            ));
        }
        let base_url = Url::parse(config.base_url.trim()).map_err(|e| {
            SummarizerError::configuration(format!(
                "invalid local model endpoint '{}': {e}",
                config.base_url
            ))
        })?;
        let client = Client::builder()
            .user_agent(concat!("clinical-summarizer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SummarizerError::configuration(format!("building HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            model: model.to_string(),
        })
    }

    /// Validate the configuration and confirm the server has the model loaded.
    pub async fn connect(config: &BackendConfig) -> SummarizerResult<Self> {
        let backend = Self::new(config)?;
        let available = backend.list_models().await.map_err(|e| {
            SummarizerError::configuration(format!(
                "local model server at {} is not reachable: {e}",
                backend.base_url
            ))
        })?;
        if !available.iter().any(|name| backend.matches_model(name)) {
            return Err(SummarizerError::configuration(format!(
                "model '{}' is not available on {} (found: {})",
                backend.model,
                backend.base_url,
                available.join(", ")
            )));
        }
        info!(model = %backend.model, url = %backend.base_url, "local model available");
        Ok(backend)
    }

    async fn list_models(&self) -> Result<Vec<String>, reqwest::Error> {
        let tags: TagsResponse = self
            .client
            .get(self.url("api/tags"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    fn matches_model(&self, name: &str) -> bool {
        name == self.model
            || name
                .strip_suffix(":latest")
                .is_some_and(|base| base == self.model)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    fn fail(&self, message: String) -> SummarizerError {
        error!(backend = BACKEND, model = %self.model, %message, "generation failed");
        SummarizerError::unavailable(BACKEND, message)
    }
}

#[async_trait]
impl GenerationBackend for LocalBackend {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> SummarizerResult<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: ModelOptions {
                temperature: options.temperature,
                num_predict: options.max_output_tokens,
                seed: options.seed,
            },
        };
        debug!(model = %self.model, prompt_chars = prompt.len(), "calling local model");

        let response = self
            .client
            .post(self.url("api/generate"))
            .json(&request)
            .send()
            .await
            .map_err(|e| self.fail(format!("network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.fail(format!("HTTP {status}: {body}")));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .map_err(|e| self.fail(format!("failed to parse response: {e}")))?;

        let text = strip_prompt_echo(&payload.response, prompt);
        if text.is_empty() {
            return Err(self.fail("model returned no text beyond the prompt echo".to_string()));
        }
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: ModelOptions,
}

#[derive(Debug, Serialize)]
struct ModelOptions {
    temperature: f32,
    num_predict: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}
