//! Remote backend for the Gemini `generateContent` API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{
    config::BackendConfig,
    error::{SummarizerError, SummarizerResult},
};

use super::{GenerationBackend, GenerationOptions};

const BACKEND: &str = "gemini";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for a hosted Gemini model. The API key is validated at construction.
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(config: &BackendConfig) -> SummarizerResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                SummarizerError::configuration(
                    "Gemini API key not found; set GEMINI_API_KEY or GOOGLE_API_KEY",
                )
            })?
            .to_string();
        let model = config.model_id.trim();
        if model.is_empty() {
            return Err(SummarizerError::configuration(
                "Gemini model identifier is empty",
            ));
        }
        let client = Client::builder()
            .user_agent(concat!("clinical-summarizer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SummarizerError::configuration(format!("building HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn fail(&self, message: String) -> SummarizerError {
        error!(backend = BACKEND, model = %self.model, %message, "generation failed");
        SummarizerError::unavailable(BACKEND, message)
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
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
        let request = GenerateContentRequest::new(prompt, options);
        debug!(model = %self.model, prompt_chars = prompt.len(), "calling gemini");

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.fail(format!("network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.fail(format!("HTTP {status}: {body}")));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| self.fail(format!("failed to parse response: {e}")))?;

        payload
            .text()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| self.fail("response contained no candidate text".to_string()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str, options: &GenerationOptions) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_output_tokens,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let text: String = candidate
            .content?
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}
