//! Microsoft Graph Approvals client for apsync.
//!
//! This crate owns all Graph plumbing for the ticket-to-approval
//! synchronizer:
//!
//! - Device-code OAuth2 with silent token reuse (`DeviceAuthenticator`)
//! - A thin HTTP wrapper with bearer injection and full pagination
//!   (`GraphClient`)
//! - The Approvals API surface: create, list, respond (`ApprovalsClient`)
//! - Approver lookup by email (`resolve_approver`)
//!
//! The client layer is deliberately retry-free; transient failures are
//! handled by the reconciliation engine where the protocol calls for it.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use apsync_graph::{ApprovalsClient, DeviceAuthenticator, GraphClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let authenticator = Arc::new(DeviceAuthenticator::new("client-id", "tenant-id")?);
//! let graph = GraphClient::new(authenticator)?;
//! let approvals = ApprovalsClient::new(graph);
//! let items = approvals.list_all().await?;
//! # Ok(())
//! # }
//! ```

mod approvals;
mod auth;
mod client;
mod error;
mod users;

// Re-exports
pub use approvals::{
    ApprovalApprover, ApprovalDecision, ApprovalRecord, ApprovalRequest, ApprovalsClient,
    DecisionSubmission, UserRef,
};
pub use auth::{
    DeviceAuthenticator, DeviceCodeResponse, StaticTokenProvider, TokenProvider,
    DEFAULT_LOGIN_BASE_URL, DEFAULT_SCOPES,
};
pub use client::{GraphClient, ODataError, ODataErrorBody, ODataResponse, DEFAULT_GRAPH_BASE_URL};
pub use error::{GraphError, GraphResult};
pub use users::resolve_approver;
