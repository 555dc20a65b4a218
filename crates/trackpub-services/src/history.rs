//! History log client.
//!
//! Thin wrapper around the external spreadsheet macro endpoint. Appends are
//! best-effort by contract: the caller fires them after a successful publish
//! and swallows failures. Reads and clears pass the script's JSON response
//! through without interpreting it.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use trackpub_core::error::AppError;
use trackpub_core::models::HistoryEntry;

const SERVICE_NAME: &str = "history log";

pub struct HistoryClient {
    http_client: reqwest::Client,
    script_url: String,
}

impl HistoryClient {
    pub fn new(script_url: String, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for the history log")?;

        Ok(Self {
            http_client,
            script_url,
        })
    }

    /// Append one entry to the spreadsheet.
    pub async fn append(&self, entry: &HistoryEntry) -> Result<(), AppError> {
        let response = self
            .http_client
            .post(&self.script_url)
            .json(entry)
            .send()
            .await
            .map_err(|e| upstream_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(upstream_error(format!(
                "append rejected with status {}",
                response.status()
            )));
        }

        Ok(())
    }

    /// Fetch the spreadsheet contents; the response JSON is returned verbatim.
    pub async fn read(&self) -> Result<Value, AppError> {
        let response = self
            .http_client
            .get(&self.script_url)
            .send()
            .await
            .map_err(|e| upstream_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(upstream_error(format!(
                "read rejected with status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| upstream_error(format!("invalid JSON in history response: {}", e)))
    }

    /// Send the delete signal. The script's response is passed through when
    /// it is JSON; no confirmation of effect is parsed.
    pub async fn clear(&self) -> Result<Value, AppError> {
        let response = self
            .http_client
            .post(&self.script_url)
            .json(&json!({ "accion": "borrar" }))
            .send()
            .await
            .map_err(|e| upstream_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(upstream_error(format!(
                "clear rejected with status {}",
                response.status()
            )));
        }

        let text = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str(&text).unwrap_or(Value::Null))
    }
}

fn upstream_error(detail: String) -> AppError {
    AppError::Upstream {
        service: SERVICE_NAME.to_string(),
        detail,
    }
}
