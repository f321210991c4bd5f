//! Errors returned by calls to the Wylto backend

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WyltoError {
    /// Connection, timeout or body transfer failure
    #[error("Request to Wylto failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Wylto answered with a non-success status
    #[error("Wylto responded with {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Unexpected Wylto response: {0}")]
    Decode(String),
}

impl WyltoError {
    /// Whether the same request may succeed if sent again
    pub fn is_retryable(&self) -> bool {
        match self {
            WyltoError::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            WyltoError::Status { status, .. } => *status >= 500 || *status == 429,
            WyltoError::Decode(_) => false,
        }
    }

    /// HTTP status to report to our own API clients
    pub fn status_code(&self) -> StatusCode {
        match self {
            WyltoError::Transport(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            WyltoError::Status { status, .. } if *status == 401 || *status == 403 => {
                StatusCode::FORBIDDEN
            }
            _ => StatusCode::BAD_GATEWAY,
        }
    }

    /// Short label used for retry metrics
    pub fn reason(&self) -> &'static str {
        match self {
            WyltoError::Transport(e) if e.is_timeout() => "timeout",
            WyltoError::Transport(_) => "transport",
            WyltoError::Status { .. } => "status",
            WyltoError::Decode(_) => "decode",
        }
    }
}
