//! CLI entry-point for the legacy batch summarization job.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{config::Settings, data};

use super::BackendArgs;

/// Args for the `legacy-batch` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub backend: BackendArgs,
    /// Raw test split with Master_Index and Prompt columns; defaults to `<data>/test_raw.csv`.
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Output CSV; defaults to `<outputs>/optimizedv2_test_raw_with_prompt.csv`.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let csv = args.csv.unwrap_or_else(|| settings.join_data("test_raw.csv"));
    let output = args
        .output
        .unwrap_or_else(|| settings.join_output("optimizedv2_test_raw_with_prompt.csv"));

    let records = data::dataset::load_prompts(&csv)?;
    let service = args.backend.service(&settings).await?;
    let rows = data::legacy::run(&service, &records).await?;
    data::legacy::write_rows(&rows, &output)?;

    if let Some(first) = rows.first() {
        info!(preview = %first.clinician, "first generated row");
        println!("{}", first.clinician);
    }
    Ok(())
}
