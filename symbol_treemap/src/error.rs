use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreemapError {
    #[error("file does not exist: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("{tool} failed: {message}")]
    IngestionFailure { tool: String, message: String },

    #[error("malformed path {path:?}: {reason}")]
    MalformedPath { path: String, reason: String },

    #[error("invalid regular expression {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write rendered output: {0}")]
    Render(#[from] std::io::Error),

    #[error("failed to serialize render list: {0}")]
    Json(#[from] serde_json::Error),
}

impl TreemapError {
    pub(crate) fn ingestion(tool: &str, message: impl Into<String>) -> Self {
        Self::IngestionFailure {
            tool: tool.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn malformed(path: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
