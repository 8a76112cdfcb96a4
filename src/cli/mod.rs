//! Command-line interface wiring for clinical-summarizer.

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::{
    config::{BackendConfig, Mode, Settings},
    nlp::SummarizerService,
};

pub mod evaluate;
pub mod legacy;
pub mod prepare;
pub mod serve;
pub mod summarize;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Structured clinical summaries from nurse case notes", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Summarize(args) => summarize::run(args, settings).await,
            Commands::Serve(args) => serve::run(args, settings).await,
            Commands::Evaluate(args) => evaluate::run(args, settings).await,
            Commands::PrepareFinetune(args) => prepare::run(args, settings).await,
            Commands::LegacyBatch(args) => legacy::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summarize a single clinical note.
    Summarize(summarize::Args),
    /// Serve the JSON API.
    Serve(serve::Args),
    /// Score generated summaries against clinician references with ROUGE.
    Evaluate(evaluate::Args),
    /// Export the dataset as JSONL for fine-tuning.
    PrepareFinetune(prepare::Args),
    /// Run the legacy lower-cased batch summarization over a test split.
    LegacyBatch(legacy::Args),
}

/// Backend selection shared by every generating sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct BackendArgs {
    /// Generation backend; defaults to the MODE environment variable.
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,
    /// Model identifier; defaults to the backend's configured model.
    #[arg(long)]
    pub model: Option<String>,
}

impl BackendArgs {
    pub fn config(&self, settings: &Settings) -> BackendConfig {
        let mode = self.mode.unwrap_or(settings.mode);
        settings.backend_config(mode, self.model.as_deref())
    }

    /// Construct the service once, failing fast on missing configuration.
    pub async fn service(&self, settings: &Settings) -> Result<SummarizerService> {
        Ok(SummarizerService::from_config(&self.config(settings)).await?)
    }
}
