//! History log passthrough routes.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::Value;

use crate::error::HttpAppError;
use crate::state::AppState;
use trackpub_core::AppError;
use trackpub_services::HistoryClient;

fn history_client(state: &AppState) -> Result<&HistoryClient, AppError> {
    state
        .history
        .as_ref()
        .ok_or_else(|| AppError::NotFound("History log is not configured".to_string()))
}

/// Passthrough of the spreadsheet contents.
pub async fn read_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, HttpAppError> {
    let history = history_client(&state)?;
    let contents = history.read().await?;
    Ok(Json(contents))
}

/// Passthrough delete signal; the script's answer is forwarded as-is.
pub async fn clear_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, HttpAppError> {
    let history = history_client(&state)?;
    let ack = history.clear().await?;
    tracing::info!("History clear signal sent");
    Ok(Json(ack))
}
