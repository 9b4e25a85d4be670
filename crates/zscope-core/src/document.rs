//! # Document Loading
//!
//! Registry documents and generation manifests are plain serde types stored
//! as YAML or JSON. The format is chosen from the file extension:
//! `.yaml`/`.yml` is YAML, everything else is JSON.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::CoreError;

/// On-disk encoding of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON (`.json` or any unrecognized extension).
    Json,
    /// YAML (`.yaml` / `.yml`).
    Yaml,
}

impl DocumentFormat {
    /// Pick the format for a path from its extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Parse a document from a string in the given format.
///
/// `label` names the document in error messages (usually its path).
pub fn parse_document<T: DeserializeOwned>(
    content: &str,
    format: DocumentFormat,
    label: &str,
) -> Result<T, CoreError> {
    match format {
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| CoreError::DocumentLoad {
            path: label.to_string(),
            reason: format!("invalid YAML: {e}"),
        }),
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| CoreError::DocumentLoad {
            path: label.to_string(),
            reason: format!("invalid JSON: {e}"),
        }),
    }
}

/// Read and parse a YAML or JSON document from disk.
///
/// # Errors
///
/// Returns `CoreError::DocumentLoad` if the file cannot be read or does not
/// deserialize into `T`.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, CoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| CoreError::DocumentLoad {
        path: path.display().to_string(),
        reason: format!("cannot read file: {e}"),
    })?;
    parse_document(&content, DocumentFormat::from_path(path), &path.display().to_string())
}
