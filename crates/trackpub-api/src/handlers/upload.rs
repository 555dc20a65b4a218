//! CSV upload handler: validate the multipart form, drive the deposition
//! publish chain, then log the public link to the history spreadsheet.

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::error::HttpAppError;
use crate::state::AppState;
use trackpub_core::config::DEFAULT_ACCOUNT;
use trackpub_core::models::{DepositionMetadata, HistoryEntry};
use trackpub_core::validation::{
    filename_stem, sanitize_filename, validate_csv_filename, validate_file_size,
};
use trackpub_core::AppError;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub mensaje: String,
    pub zenodo_url: String,
}

/// Multipart form fields as sent by the web client. Field names are the wire
/// names (`autor`, `descripcion`, `cuenta`, `hora_local`).
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<(String, Vec<u8>)>,
    author: Option<String>,
    description: Option<String>,
    account: Option<String>,
    client_time: Option<String>,
}

pub async fn upload_csv(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let request_id = uuid::Uuid::new_v4();

    let form = read_form(multipart).await?;
    let (raw_filename, data) = form
        .file
        .ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;

    validate_csv_filename(&raw_filename)?;
    validate_file_size(data.len(), state.config.max_file_size_bytes)?;
    let filename = sanitize_filename(&raw_filename)?;

    let account = form
        .account
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string());
    let metadata = DepositionMetadata::for_upload(
        filename_stem(&filename),
        form.author,
        form.description,
        state.config.zenodo_community.clone(),
    );

    tracing::info!(
        request_id = %request_id,
        filename = %filename,
        account = %account,
        file_size = data.len(),
        "Processing CSV upload"
    );

    let record_url = state
        .zenodo
        .publish_csv(&account, &metadata, &filename, data)
        .await?;

    tracing::info!(request_id = %request_id, record_url = %record_url, "Upload published");

    // Best-effort history append: failures are logged and never change the
    // outcome of the upload that already succeeded.
    if let Some(history) = &state.history {
        let entry = HistoryEntry::published(filename, record_url.clone(), form.client_time);
        if let Err(err) = history.append(&entry).await {
            tracing::warn!(
                request_id = %request_id,
                error = %err,
                "Failed to append history entry"
            );
        }
    }

    Ok(Json(UploadResponse {
        mensaje: "Archivo subido y publicado correctamente en Zenodo.".to_string(),
        zenodo_url: record_url,
    }))
}

/// Walk the multipart fields; only one `file` field is accepted, unknown
/// fields are ignored.
async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            "file" => {
                if form.file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ));
                }
                let filename = field
                    .file_name()
                    .map(|s: &str| s.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                let data = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read file data: {}", e))
                })?;
                form.file = Some((filename, data.to_vec()));
            }
            "autor" => form.author = read_text_field(field).await?,
            "descripcion" => form.description = read_text_field(field).await?,
            "cuenta" => form.account = read_text_field(field).await?,
            "hora_local" => form.client_time = read_text_field(field).await?,
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<Option<String>, AppError> {
    let text = field
        .text()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read form field: {}", e)))?;
    Ok(Some(text).filter(|s| !s.trim().is_empty()))
}
