//! CLI error types and exit codes.

use thiserror::Error;

use apsync_graph::GraphError;
use apsync_source::SourceError;

use crate::config::ConfigError;

/// Exit codes for the CLI:
/// - 0: Success (per-ticket failures included; they are outcomes, not errors)
/// - 1: General error
/// - 2: Authentication failure
/// - 3: Ticket source failure
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Auth(GraphError),

    #[error("Failed to fetch tickets: {0}")]
    TicketSource(#[from] SourceError),

    #[error("{0}")]
    Graph(GraphError),
}

impl AppError {
    /// Classifies a Graph failure from the startup phase: credential and
    /// device-flow problems are authentication failures, everything else is
    /// a general error.
    pub fn from_startup_graph_error(error: GraphError) -> Self {
        match error {
            GraphError::Auth(_)
            | GraphError::AuthorizationDenied
            | GraphError::DeviceCodeExpired => Self::Auth(error),
            other => Self::Graph(other),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Auth(_) => 2,
            Self::TicketSource(_) => 3,
            Self::Config(_) | Self::Graph(_) => 1,
        }
    }

    pub fn print(&self) {
        crate::output::print_error(&self.to_string());
    }
}
