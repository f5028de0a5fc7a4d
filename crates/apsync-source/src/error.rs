//! Error types for ticket sources.

use thiserror::Error;

/// Result type alias using `SourceError`.
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors that can occur when fetching tickets.
///
/// Every variant is fatal for the run: without a ticket list there is
/// nothing to process, so sources do not retry.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Login against the ticket backend failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Non-success HTTP status from the ticket backend.
    #[error("Ticket API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The backend answered 200 but flagged a logical error in its envelope.
    #[error("Ticket API rejected the request: {0}")]
    Rejected(String),

    /// HTTP transport error (includes request timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
