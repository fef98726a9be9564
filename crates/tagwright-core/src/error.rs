//! Error types for tagwright.

use thiserror::Error;

/// Result type alias using tagwright's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tagwright operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller supplied empty or missing required input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The remote system answered with a non-success status
    #[error("Paperless API error (status {status}): {body}")]
    Remote { status: u16, body: String },

    /// A request ran past its time budget; the remote state is unknown
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Documents were re-assigned but removing the merged sources failed
    #[error(
        "Merge incomplete: documents were assigned to '{target}' but deleting the merged \
         sources failed ({reason}). Retry the deletion after refreshing."
    )]
    MergeIncomplete { target: String, reason: String },

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Inference/generation failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the remote system reported the resource as missing (HTTP 404).
    pub fn is_remote_not_found(&self) -> bool {
        matches!(self, Error::Remote { status: 404, .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            let target = e
                .url()
                .map(|url| url.path().to_string())
                .unwrap_or_else(|| "remote".to_string());
            Error::Timeout(uncertain_outcome(&target))
        } else {
            Error::Request(e.to_string())
        }
    }
}

/// Wording for a request whose effect on the remote is unknown.
fn uncertain_outcome(target: &str) -> String {
    format!(
        "request to {target} did not finish in time. The operation may have partially \
         applied; re-fetch to verify before retrying."
    )
}
