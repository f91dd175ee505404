//! Errors raised by the GitHub adapter.

use std::path::PathBuf;

use thiserror::Error;
use triage::TriageError;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("Failed to read search snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Search snapshot {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A search node is missing data the domain requires.
    #[error("Invalid {kind} node {id:?}: {message}")]
    InvalidNode {
        kind: &'static str,
        id: String,
        message: String,
    },
}

impl GithubError {
    pub(crate) fn invalid_node(kind: &'static str, id: &str, message: impl Into<String>) -> Self {
        Self::InvalidNode {
            kind,
            id: id.to_owned(),
            message: message.into(),
        }
    }
}

impl From<GithubError> for TriageError {
    fn from(error: GithubError) -> Self {
        TriageError::provider("github", error.to_string())
    }
}
