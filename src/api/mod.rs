//! HTTP layer exposing the summarizer service.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::nlp::SummarizerService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SummarizerService>,
}

impl AppState {
    pub fn new(service: SummarizerService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/summarize", post(routes::summarize))
        .route("/summarize/batch", post(routes::summarize_batch))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(service: SummarizerService, host: String, port: u16) -> Result<()> {
    let mode = service.mode();
    let router = router(AppState::new(service));

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, %mode, "serving summarization API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for shutdown signal");
    }
}
