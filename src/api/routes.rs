//! HTTP route handlers for Axum.

use axum::{extract::State, http::StatusCode, Json};
use tracing::{error, warn};

use crate::{
    api::types::{
        BatchSummarizeRequest, BatchSummarizeResponse, StatusResponse, SummarizeRequest,
        SummarizeResponse,
    },
    error::SummarizerError,
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

pub async fn root(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Medical Summarization API is running".to_string(),
        mode: state.service.mode().to_string(),
        model: state.service.model().to_string(),
    })
}

pub async fn summarize(
    State(state): State<AppState>,
    Json(request): Json<SummarizeRequest>,
) -> ApiResult<SummarizeResponse> {
    if request.text.trim().is_empty() {
        return Err(into_status(SummarizerError::Validation(
            "Text cannot be empty".to_string(),
        )));
    }
    let summary = state
        .service
        .summarize(&request.text)
        .await
        .map_err(into_status)?;
    Ok(Json(SummarizeResponse { summary }))
}

pub async fn summarize_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchSummarizeRequest>,
) -> ApiResult<BatchSummarizeResponse> {
    if request.texts.is_empty() || request.texts.iter().any(|t| t.trim().is_empty()) {
        return Err(into_status(SummarizerError::Validation(
            "All texts must be non-empty".to_string(),
        )));
    }
    let summaries = state
        .service
        .batch_summarize(&request.texts)
        .await
        .map_err(into_status)?;
    Ok(Json(BatchSummarizeResponse { summaries }))
}

fn into_status(err: SummarizerError) -> (StatusCode, String) {
    match err {
        SummarizerError::Validation(message) => {
            warn!(%message, "rejected request");
            (StatusCode::BAD_REQUEST, message)
        }
        err @ SummarizerError::BackendUnavailable { .. } => {
            error!(error = %err, "summarization request failed");
            (StatusCode::BAD_GATEWAY, err.to_string())
        }
        err @ SummarizerError::Configuration(_) => {
            error!(error = %err, "summarization request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}
