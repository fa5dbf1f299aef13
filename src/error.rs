//! Error types for the NextCaptcha client.

use thiserror::Error;

/// Result type alias for NextCaptcha operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the client.
///
/// Remote task outcomes are not errors: a task the service solved, failed, or
/// that timed out comes back as a [`TaskResult`](crate::TaskResult). This enum
/// covers the faults that prevent a result from being obtained at all.
#[derive(Debug, Error)]
pub enum Error {
    /// Client key not configured
    #[error("client key not configured")]
    MissingClientKey,

    /// Network-level failure (connect, request timeout, TLS)
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-200 status
    #[error("API error: status {status}, body {body}")]
    Api {
        /// HTTP status code of the response
        status: u16,
        /// Decoded response body, or the raw text if it was not JSON
        body: serde_json::Value,
    },

    /// createTask answered 200 but refused the task
    #[error(
        "task rejected: errorId={}, code={}, description={}",
        .error_id,
        .error_code.as_deref().unwrap_or("none"),
        .error_description.as_deref().unwrap_or("none")
    )]
    TaskRejected {
        /// Numeric error code reported by the service
        error_id: i32,
        /// Machine-readable error code, if present
        error_code: Option<String>,
        /// Human-readable description, if present
        error_description: Option<String>,
    },

    /// A 200 response body that could not be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
