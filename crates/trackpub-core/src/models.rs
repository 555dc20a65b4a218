//! Domain models shared across the relay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_CREATOR: &str = "Anonymous";
const DEFAULT_DESCRIPTION: &str = "GPS track uploaded from the web client";

/// Metadata attached to a new deposition draft.
///
/// The deposition record itself is owned by the external repository; this is
/// only the payload we send when driving the draft -> published transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositionMetadata {
    pub title: String,
    pub description: String,
    pub creator: String,
    pub community: Option<String>,
}

impl DepositionMetadata {
    /// Build metadata for an uploaded track file. `title_stem` is the
    /// sanitized filename without its extension; empty/missing form fields
    /// fall back to neutral defaults.
    pub fn for_upload(
        title_stem: &str,
        creator: Option<String>,
        description: Option<String>,
        community: Option<String>,
    ) -> Self {
        DepositionMetadata {
            title: title_stem.to_string(),
            description: description
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            creator: creator
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CREATOR.to_string()),
            community,
        }
    }
}

/// One row of the external spreadsheet log.
///
/// Field names follow the spreadsheet's wire format (the web client reads
/// `nombre` / `enlace` / `fecha` verbatim).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    #[serde(rename = "nombre")]
    pub filename: String,
    #[serde(rename = "enlace")]
    pub link: String,
    #[serde(rename = "fecha")]
    pub timestamp: String,
}

impl HistoryEntry {
    /// Entry for a freshly published record. `client_time` is the uploader's
    /// wall clock when provided; otherwise the server's UTC now is used.
    pub fn published(filename: String, link: String, client_time: Option<String>) -> Self {
        let timestamp = client_time
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| now_rfc3339());
        HistoryEntry {
            filename,
            link,
            timestamp,
        }
    }
}

fn now_rfc3339() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
