//! Runtime configuration utilities for clinical-summarizer.

use std::{
    env, fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::backend::GenerationOptions;

pub const DEFAULT_LOCAL_MODEL: &str = "qwen2.5:0.5b";
pub const DEFAULT_LOCAL_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Which generation backend a service instance talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Locally served model (Ollama-compatible endpoint).
    Local,
    /// Hosted Gemini generateContent API.
    Gemini,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Gemini => "gemini",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "gemini" => Ok(Self::Gemini),
            other => anyhow::bail!("mode must be 'gemini' or 'local', got '{other}'"),
        }
    }
}

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Default backend when no `--mode` flag is given.
    pub mode: Mode,
    /// Model tag served by the local endpoint.
    pub local_model: String,
    /// Root URL of the local model server.
    pub local_base_url: String,
    /// Remote model identifier.
    pub gemini_model: String,
    /// Remote API key; required only in gemini mode.
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    /// Sampling randomness, 0 is deterministic.
    pub temperature: f32,
    /// Truncation bound on generated tokens.
    pub max_output_tokens: u32,
    pub seed: u64,
    /// Root folder for datasets.
    pub data_dir: PathBuf,
    /// Root folder for generated artefacts.
    pub outputs_dir: PathBuf,
    /// MLflow server used by `evaluate --track`.
    pub mlflow_tracking_uri: Option<String>,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let settings = Self::from_vars(|key| env::var(key).ok())?;

        std::fs::create_dir_all(&settings.data_dir).context("creating data dir")?;
        std::fs::create_dir_all(&settings.outputs_dir).context("creating outputs dir")?;

        Ok(settings)
    }

    /// Resolve settings from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_vars<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = match var("MODE") {
            Some(raw) => raw.parse::<Mode>().context("parsing MODE")?,
            None => Mode::Local,
        };
        let local_model = var("LOCAL_MODEL_PATH").unwrap_or_else(|| DEFAULT_LOCAL_MODEL.to_string());
        let local_base_url =
            var("LOCAL_BASE_URL").unwrap_or_else(|| DEFAULT_LOCAL_BASE_URL.to_string());
        let gemini_model = var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let gemini_api_key = var("GEMINI_API_KEY").or_else(|| var("GOOGLE_API_KEY"));
        let gemini_base_url =
            var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());
        let temperature: f32 = parse_var(&var, "TEMPERATURE", 0.0)?;
        let max_output_tokens: u32 = parse_var(&var, "MAX_OUTPUT_TOKENS", 256)?;
        let seed: u64 = parse_var(&var, "SEED", 42)?;
        let data_dir = var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));
        let outputs_dir = var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./outputs"));
        let mlflow_tracking_uri = var("MLFLOW_TRACKING_URI");

        Ok(Self {
            mode,
            local_model,
            local_base_url,
            gemini_model,
            gemini_api_key,
            gemini_base_url,
            temperature,
            max_output_tokens,
            seed,
            data_dir,
            outputs_dir,
            mlflow_tracking_uri,
        })
    }

    /// Build the backend configuration for `mode`, optionally overriding the model id.
    pub fn backend_config(&self, mode: Mode, model: Option<&str>) -> BackendConfig {
        let (default_model, base_url, api_key) = match mode {
            Mode::Local => (&self.local_model, &self.local_base_url, None),
            Mode::Gemini => (
                &self.gemini_model,
                &self.gemini_base_url,
                self.gemini_api_key.clone(),
            ),
        };
        BackendConfig {
            mode,
            model_id: model.map(str::to_string).unwrap_or_else(|| default_model.clone()),
            api_key,
            base_url: base_url.clone(),
            options: GenerationOptions {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
                seed: Some(self.seed),
            },
        }
    }

    /// Convenience helper for derived path segments.
    pub fn join_data<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.data_dir.join(path)
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}

fn parse_var<T, F>(var: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("parsing {key}={raw:?}")),
        None => Ok(default),
    }
}

/// Everything a backend needs, fixed for the lifetime of one service instance.
#[derive(Clone)]
pub struct BackendConfig {
    pub mode: Mode,
    pub model_id: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub options: GenerationOptions,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("mode", &self.mode)
            .field("model_id", &self.model_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish()
    }
}
