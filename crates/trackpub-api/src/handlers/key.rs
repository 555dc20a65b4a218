//! Browser map-key route.
//!
//! Serves only `OPENWEATHER_BROWSER_KEY`, a value the operator has explicitly
//! designated safe for client-side use. Server-side tokens are never
//! serialized into a response.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::error::HttpAppError;
use crate::state::AppState;
use trackpub_core::AppError;

pub async fn openweather_key(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, HttpAppError> {
    match &state.config.openweather_browser_key {
        Some(key) => Ok(Json(json!({ "key": key }))),
        None => Err(AppError::NotFound("No browser API key is configured".to_string()).into()),
    }
}
