//! Errors raised by the file-backed enrichment store.

use std::path::PathBuf;

use thiserror::Error;
use triage::TriageError;

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Failed to access annotation file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Annotation file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Generated annotation id is empty")]
    EmptyId,

    #[error("Failed to encode annotations: {0}")]
    Encode(#[source] serde_json::Error),
}

impl From<EnrichmentError> for TriageError {
    fn from(error: EnrichmentError) -> Self {
        TriageError::enrichment(error.to_string())
    }
}
