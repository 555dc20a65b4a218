//! Deposition API client.
//!
//! Drives the three-call publish chain against the external research-data
//! repository: create an empty draft, attach the uploaded file, publish.
//! The chain is strictly sequential and short-circuits on the first
//! unexpected status; there are no retries, no compensation for partially
//! created drafts, and no idempotency key, so re-running a failed upload
//! creates a new draft on the remote side.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;

use trackpub_core::error::{AppError, DepositionStep};
use trackpub_core::models::DepositionMetadata;

/// Response of the draft-creation call; only the assigned id is used.
#[derive(Debug, Deserialize)]
struct DepositionResponse {
    id: u64,
}

pub struct ZenodoClient {
    http_client: reqwest::Client,
    base_url: String,
    record_base: String,
    /// Account name -> API token.
    tokens: HashMap<String, String>,
}

impl ZenodoClient {
    pub fn new(
        base_url: String,
        record_base: String,
        tokens: HashMap<String, String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for the deposition API")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            record_base: record_base.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Public URL of a published record.
    pub fn record_url(&self, id: u64) -> String {
        format!("{}/{}", self.record_base, id)
    }

    fn token_for(&self, account: &str) -> Result<&str, AppError> {
        self.tokens
            .get(&account.to_uppercase())
            .map(String::as_str)
            .ok_or_else(|| {
                AppError::InvalidInput(format!("Unknown deposition account '{}'", account))
            })
    }

    /// Run the full create -> attach -> publish chain and return the public
    /// record URL.
    pub async fn publish_csv(
        &self,
        account: &str,
        metadata: &DepositionMetadata,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<String, AppError> {
        let token = self.token_for(account)?;

        let deposition_id = self.create_deposition(token, metadata).await?;
        tracing::info!(
            deposition_id,
            account = %account,
            title = %metadata.title,
            "Deposition draft created"
        );

        self.attach_file(token, deposition_id, filename, data)
            .await?;
        tracing::info!(deposition_id, filename = %filename, "File attached to deposition");

        self.publish(token, deposition_id).await?;
        tracing::info!(deposition_id, "Deposition published");

        Ok(self.record_url(deposition_id))
    }

    /// Step 1: create an empty draft carrying the metadata; expects 201.
    async fn create_deposition(
        &self,
        token: &str,
        metadata: &DepositionMetadata,
    ) -> Result<u64, AppError> {
        let response = self
            .http_client
            .post(&self.base_url)
            .bearer_auth(token)
            .json(&metadata_payload(metadata))
            .send()
            .await
            .map_err(|e| step_error(DepositionStep::Create, e))?;

        let status = response.status();
        if status.as_u16() != 201 {
            return Err(unexpected_status(DepositionStep::Create, response).await);
        }

        let deposition: DepositionResponse = response.json().await.map_err(|e| {
            AppError::Deposition {
                step: DepositionStep::Create,
                status: Some(status.as_u16()),
                detail: format!("Failed to parse deposition response: {}", e),
            }
        })?;

        Ok(deposition.id)
    }

    /// Step 2: attach the CSV to the draft; expects 201.
    async fn attach_file(
        &self,
        token: &str,
        deposition_id: u64,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<(), AppError> {
        let url = format!("{}/{}/files", self.base_url, deposition_id);

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str("text/csv")
            .map_err(|e| AppError::Internal(format!("Failed to build multipart body: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| step_error(DepositionStep::AttachFile, e))?;

        if response.status().as_u16() != 201 {
            return Err(unexpected_status(DepositionStep::AttachFile, response).await);
        }

        Ok(())
    }

    /// Step 3: publish the draft; expects 202.
    async fn publish(&self, token: &str, deposition_id: u64) -> Result<(), AppError> {
        let url = format!("{}/{}/actions/publish", self.base_url, deposition_id);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| step_error(DepositionStep::Publish, e))?;

        if response.status().as_u16() != 202 {
            return Err(unexpected_status(DepositionStep::Publish, response).await);
        }

        Ok(())
    }
}

fn metadata_payload(metadata: &DepositionMetadata) -> serde_json::Value {
    let mut fields = json!({
        "upload_type": "dataset",
        "title": metadata.title,
        "description": metadata.description,
        "creators": [{ "name": metadata.creator }],
    });
    if let Some(community) = &metadata.community {
        fields["communities"] = json!([{ "identifier": community }]);
    }
    json!({ "metadata": fields })
}

fn step_error(step: DepositionStep, err: reqwest::Error) -> AppError {
    AppError::Deposition {
        step,
        status: None,
        detail: err.to_string(),
    }
}

async fn unexpected_status(step: DepositionStep, response: reqwest::Response) -> AppError {
    let status = response.status().as_u16();
    let detail = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    AppError::Deposition {
        step,
        status: Some(status),
        detail,
    }
}
