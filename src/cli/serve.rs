//! CLI entry-point for serving the HTTP API.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{api, config::Settings};

use super::BackendArgs;

/// Run the Axum server.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    #[command(flatten)]
    pub backend: BackendArgs,
    /// Port to bind (default 8000).
    #[arg(long, default_value_t = 8000)]
    pub port: u16,
    /// Host address, defaults to localhost.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let service = args.backend.service(&settings).await?;
    api::serve(service, args.host, args.port).await
}
