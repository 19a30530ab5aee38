use reqwest::StatusCode;
use thiserror::Error as ThisError;

use super::IsRetryable;

#[derive(Debug, ThisError)]
pub enum AiError {
    #[error("Anthropic API key not configured")]
    MissingApiKey,

    /// Transport-level failure (DNS, connect, timeouts, etc).
    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Upstream error ({status}): {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("Model response contained no text")]
    EmptyResponse,

    /// The model answered, but not with the JSON shape we asked for.
    #[error("Failed to parse model output: {source}")]
    InvalidOutput {
        #[source]
        source: serde_json::Error,
        preview: String,
    },
}

impl IsRetryable for AiError {
    fn is_retryable(&self) -> bool {
        match self {
            AiError::Reqwest(e) => e.is_connect() || e.is_timeout(),
            AiError::Upstream { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}
