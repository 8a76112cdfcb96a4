//! Minimal MLflow tracking client speaking the REST API.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

pub const DEFAULT_EXPERIMENT: &str = "Clinical_Summarization";

/// Handle on one MLflow experiment.
pub struct MlflowTracker {
    client: Client,
    tracking_uri: String,
    base_url: String,
    experiment_id: String,
}

/// An open MLflow run. Call [`MlflowRun::end`] once logging is done.
pub struct MlflowRun<'a> {
    tracker: &'a MlflowTracker,
    pub run_id: String,
    /// Run artifact root relative to the `mlflow-artifacts` proxy.
    artifact_root: String,
}

impl MlflowTracker {
    /// Resolve `experiment`, creating it when the server does not know it yet.
    pub async fn connect(tracking_uri: &str, experiment: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("clinical-summarizer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let tracking_uri = tracking_uri.trim_end_matches('/').to_string();
        let base_url = format!("{tracking_uri}/api/2.0/mlflow");

        let resp = client
            .get(format!("{base_url}/experiments/get-by-name"))
            .query(&[("experiment_name", experiment)])
            .send()
            .await
            .context("looking up MLflow experiment")?;
        let experiment_id = match resp.status() {
            status if status.is_success() => {
                let body: GetExperimentResponse = resp.json().await?;
                body.experiment.experiment_id
            }
            StatusCode::NOT_FOUND => {
                let body: CreateExperimentResponse = client
                    .post(format!("{base_url}/experiments/create"))
                    .json(&json!({ "name": experiment }))
                    .send()
                    .await?
                    .error_for_status()
                    .context("creating MLflow experiment")?
                    .json()
                    .await?;
                body.experiment_id
            }
            status => bail!("MLflow experiment lookup failed with HTTP {status}"),
        };
        info!(%experiment, %experiment_id, "mlflow experiment ready");

        Ok(Self {
            client,
            tracking_uri,
            base_url,
            experiment_id,
        })
    }

    pub async fn start_run(&self, run_name: &str, tags: &[(&str, String)]) -> Result<MlflowRun<'_>> {
        let tags: Vec<KeyValue> = tags
            .iter()
            .map(|(key, value)| KeyValue {
                key: (*key).to_string(),
                value: value.clone(),
            })
            .collect();
        let body: CreateRunResponse = self
            .post(
                "runs/create",
                json!({
                    "experiment_id": self.experiment_id,
                    "run_name": run_name,
                    "start_time": Utc::now().timestamp_millis(),
                    "tags": tags,
                }),
            )
            .await?
            .json()
            .await?;
        let RunInfo {
            run_id,
            artifact_uri,
        } = body.run.info;
        let artifact_root = match artifact_uri.strip_prefix("mlflow-artifacts:") {
            Some(rest) => rest.trim_matches('/').to_string(),
            None => format!("{}/{run_id}/artifacts", self.experiment_id),
        };
        info!(%run_id, "started mlflow run");
        Ok(MlflowRun {
            tracker: self,
            run_id,
            artifact_root,
        })
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}/{path}", self.base_url))
            .json(&body)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("MLflow {path}"))?)
    }
}

impl MlflowRun<'_> {
    pub async fn log_params(&self, params: &[(&str, String)]) -> Result<()> {
        let params: Vec<KeyValue> = params
            .iter()
            .map(|(key, value)| KeyValue {
                key: (*key).to_string(),
                value: value.clone(),
            })
            .collect();
        self.tracker
            .post(
                "runs/log-batch",
                json!({ "run_id": self.run_id, "params": params }),
            )
            .await?;
        Ok(())
    }

    pub async fn log_metrics(&self, metrics: &[(&str, f64)], step: i64) -> Result<()> {
        let timestamp = Utc::now().timestamp_millis();
        let metrics: Vec<serde_json::Value> = metrics
            .iter()
            .map(|(key, value)| {
                json!({ "key": key, "value": value, "timestamp": timestamp, "step": step })
            })
            .collect();
        self.tracker
            .post(
                "runs/log-batch",
                json!({ "run_id": self.run_id, "metrics": metrics }),
            )
            .await?;
        Ok(())
    }

    /// Upload a local file into the run's artifact root, keeping its file name.
    pub async fn log_artifact(&self, path: &Path) -> Result<()> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .with_context(|| format!("artifact path has no file name: {}", path.display()))?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading artifact {}", path.display()))?;
        let url = format!(
            "{}/api/2.0/mlflow-artifacts/artifacts/{}/{file_name}",
            self.tracker.tracking_uri, self.artifact_root
        );
        self.tracker
            .client
            .put(url)
            .body(bytes)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("uploading MLflow artifact {file_name}"))?;
        info!(run_id = %self.run_id, artifact = %file_name, "logged mlflow artifact");
        Ok(())
    }

    pub async fn end(self) -> Result<()> {
        self.tracker
            .post(
                "runs/update",
                json!({
                    "run_id": self.run_id,
                    "status": "FINISHED",
                    "end_time": Utc::now().timestamp_millis(),
                }),
            )
            .await?;
        info!(run_id = %self.run_id, "mlflow run ended");
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct KeyValue {
    key: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct GetExperimentResponse {
    experiment: Experiment,
}

#[derive(Debug, Deserialize)]
struct Experiment {
    experiment_id: String,
}

#[derive(Debug, Deserialize)]
struct CreateExperimentResponse {
    experiment_id: String,
}

#[derive(Debug, Deserialize)]
struct CreateRunResponse {
    run: Run,
}

#[derive(Debug, Deserialize)]
struct Run {
    info: RunInfo,
}

#[derive(Debug, Deserialize)]
struct RunInfo {
    run_id: String,
    #[serde(default)]
    artifact_uri: String,
}
