//! CLI entry-point for summarizing one note.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::config::Settings;

use super::BackendArgs;

/// Args for the `summarize` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub backend: BackendArgs,
    /// Clinical note text.
    #[arg(long, required_unless_present = "file", conflicts_with = "file")]
    pub text: Option<String>,
    /// Read the clinical note from a file instead.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let text = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("reading note from {}", path.display()))?,
        (None, None) => String::new(),
    };
    let service = args.backend.service(&settings).await?;
    let summary = service.summarize(&text).await?;
    info!(mode = %service.mode(), chars = summary.len(), "generated summary");
    println!("{summary}");
    Ok(())
}
