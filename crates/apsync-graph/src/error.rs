//! Error types for the Graph Approvals client.

use thiserror::Error;

/// Result type alias using `GraphError`.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur when talking to Microsoft Graph.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token acquisition or device flow error.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The user declined the device-flow authorization request.
    #[error("Authorization was denied.")]
    AuthorizationDenied,

    /// The device code expired before the user completed sign-in.
    #[error("Device code expired before sign-in completed.")]
    DeviceCodeExpired,

    /// Graph API error response (OData error envelope or bare status).
    #[error("Graph API error: {code} - {message}")]
    Api {
        code: String,
        message: String,
        inner_error: Option<String>,
    },

    /// HTTP transport error (includes request timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
