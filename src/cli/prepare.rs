//! CLI entry-point for the fine-tuning JSONL export.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, data};

/// Args for the `prepare-finetune` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Dataset CSV with Prompt and Clinician columns; defaults to `<data>/clinical_prompts.csv`.
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Directory receiving train.jsonl; defaults to `<data>/processed`.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let csv = args
        .csv
        .unwrap_or_else(|| settings.join_data("clinical_prompts.csv"));
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| settings.join_data("processed"));

    let records = data::dataset::load_dataset(&csv)?;
    let path = data::finetune::export_jsonl(&records, &output_dir)?;
    println!("Training dataset saved at: {}", path.display());
    Ok(())
}
