//! Upload validation helpers.
//!
//! The relay accepts exactly one kind of payload: a non-empty `.csv` file
//! small enough to forward. Filenames are sanitized before they are reused as
//! deposition titles or history entries.

use crate::error::AppError;

const MAX_FILENAME_LENGTH: usize = 255;

/// Validate that the uploaded filename carries a `.csv` extension
/// (ASCII case-insensitive).
pub fn validate_csv_filename(filename: &str) -> Result<(), AppError> {
    let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    if filename.contains('.') && extension == "csv" {
        return Ok(());
    }
    Err(AppError::InvalidInput(
        "Only .csv files are accepted".to_string(),
    ))
}

/// Validate the payload size against the configured cap.
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size == 0 {
        return Err(AppError::InvalidInput("File is empty".to_string()));
    }
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Sanitize a filename to prevent path traversal and invalid characters.
/// Returns an error if the filename contains path traversal attempts.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    let path = std::path::Path::new(filename);
    let filename_only = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    if filename_only.contains("..") {
        return Err(AppError::InvalidInput(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Ok("file.csv".to_string());
    }

    Ok(sanitized)
}

/// The sanitized filename without its final extension, used as the
/// deposition title.
pub fn filename_stem(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}
