//! CLI entry-point for ROUGE evaluation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument, warn};

use crate::{
    config::Settings,
    data,
    eval::{self, tracking::MlflowTracker, EvaluationSummary},
    nlp::SummarizerService,
};

use super::BackendArgs;

/// Args for the `evaluate` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub backend: BackendArgs,
    /// Dataset CSV with Prompt and Clinician columns.
    #[arg(long)]
    pub csv: PathBuf,
    /// Number of rows to sample; 0 evaluates the whole dataset.
    #[arg(long, default_value_t = 50)]
    pub samples: usize,
    /// Results CSV; defaults to `<outputs>/evaluation_results.csv`.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Log parameters and metrics to MLflow (requires MLFLOW_TRACKING_URI).
    #[arg(long)]
    pub track: bool,
    /// MLflow experiment name.
    #[arg(long, default_value = eval::tracking::DEFAULT_EXPERIMENT)]
    pub experiment: String,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| settings.join_output("evaluation_results.csv"));

    let records = data::dataset::load_dataset(&args.csv)?;
    let records = eval::sample(records, Some(args.samples), settings.seed);
    let service = args.backend.service(&settings).await?;

    info!(samples = records.len(), mode = %service.mode(), "evaluating");
    let results = eval::evaluate(&service, &records).await?;
    eval::write_results(&results, &output)?;

    let summary = EvaluationSummary::from_records(&results);
    println!(
        "Evaluated {} samples: ROUGE-1 {:.3}, ROUGE-L {:.3}. Results saved to {}",
        summary.samples,
        summary.mean_rouge1,
        summary.mean_rouge_l,
        output.display()
    );

    if args.track {
        match settings.mlflow_tracking_uri.as_deref() {
            Some(uri) => track(uri, &args, &service, &summary, &output).await?,
            None => warn!("--track given but MLFLOW_TRACKING_URI is unset; skipping"),
        }
    }
    Ok(())
}

async fn track(
    uri: &str,
    args: &Args,
    service: &SummarizerService,
    summary: &EvaluationSummary,
    output: &Path,
) -> Result<()> {
    let tracker = MlflowTracker::connect(uri, &args.experiment)
        .await
        .context("connecting to MLflow")?;
    let mlflow_run = tracker
        .start_run(
            &format!("evaluate-{}", service.mode()),
            &[("mode", service.mode().to_string())],
        )
        .await?;
    mlflow_run
        .log_params(&[
            ("model", service.model().to_string()),
            ("samples", summary.samples.to_string()),
        ])
        .await?;
    mlflow_run
        .log_metrics(
            &[
                ("rouge1", summary.mean_rouge1),
                ("rougeL", summary.mean_rouge_l),
            ],
            0,
        )
        .await?;
    mlflow_run.log_artifact(output).await?;
    mlflow_run.end().await
}
