//! Entry point wiring CLI dispatch to the summarizer.

use anyhow::Result;
use clinical_summarizer::{cli::Cli, config::Settings, logging};
use tracing::{info, instrument};

#[tokio::main]
#[instrument]
async fn main() -> Result<()> {
    logging::init_tracing()?;
    let cli = Cli::parse();
    let settings = Settings::load()?;

    info!(?cli, "starting command");
    cli.dispatch(settings).await
}
