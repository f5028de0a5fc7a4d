//! Graph Approvals API surface: create, list, respond.
//!
//! The create call is fire-and-forget: the remote record materializes
//! asynchronously and the response carries no identifier that can be fetched
//! back by a simple path. Callers that need the record's id must list and
//! correlate afterwards.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::instrument;

use crate::client::GraphClient;
use crate::{GraphError, GraphResult};

/// A Graph user reference (approver identity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: String,
    pub display_name: String,
}

/// One approver entry in an approval request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalApprover {
    pub user: UserRef,
}

/// Payload for creating a basic approval item.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub display_name: String,
    pub description: String,
    pub approval_type: String,
    pub allow_email_notification: bool,
    pub approvers: Vec<ApprovalApprover>,
}

impl ApprovalRequest {
    /// Builds a single-approver request of the fixed "basic" type with email
    /// notification enabled.
    pub fn basic(
        display_name: impl Into<String>,
        description: impl Into<String>,
        approver: UserRef,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            description: description.into(),
            approval_type: "basic".to_string(),
            allow_email_notification: true,
            approvers: vec![ApprovalApprover { user: approver }],
        }
    }
}

/// A remote approval item as returned by the list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRecord {
    pub id: String,
    pub display_name: String,
    pub created_date_time: DateTime<Utc>,
}

/// Decision submitted against an approval item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalDecision {
    Approve,
    Reject,
}

impl ApprovalDecision {
    /// Wire form, as the responses endpoint expects it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "Approve",
            Self::Reject => "Reject",
        }
    }

    /// Lowercase form used in auto-decision comments.
    #[must_use]
    pub fn lowercase(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for ApprovalDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApprovalDecision {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            other => Err(GraphError::Config(format!(
                "Unknown approval decision: {other}"
            ))),
        }
    }
}

/// Payload for the responses endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionSubmission {
    pub response: ApprovalDecision,
    pub comments: String,
}

/// Client for the approval items endpoints under
/// `/beta/solutions/approval/approvalItems`.
#[derive(Debug, Clone)]
pub struct ApprovalsClient {
    graph: GraphClient,
}

impl ApprovalsClient {
    pub fn new(graph: GraphClient) -> Self {
        Self { graph }
    }

    /// Returns the underlying Graph client.
    #[must_use]
    pub fn graph(&self) -> &GraphClient {
        &self.graph
    }

    fn items_url(&self) -> String {
        format!(
            "{}/beta/solutions/approval/approvalItems",
            self.graph.base_url()
        )
    }

    /// Creates an approval item. Succeeds only on 201/202; the record itself
    /// appears remotely with some delay.
    #[instrument(skip(self, request), fields(display_name = %request.display_name))]
    pub async fn create(&self, request: &ApprovalRequest) -> GraphResult<()> {
        self.graph
            .post_expecting(
                &self.items_url(),
                request,
                &[StatusCode::CREATED, StatusCode::ACCEPTED],
            )
            .await
    }

    /// Lists every approval item visible to the signed-in user, following
    /// pagination to the end.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> GraphResult<Vec<ApprovalRecord>> {
        self.graph.get_all_pages(&self.items_url()).await
    }

    /// Submits a decision for an approval item. Succeeds on 200/201/202.
    #[instrument(skip(self, comments))]
    pub async fn respond(
        &self,
        approval_id: &str,
        decision: ApprovalDecision,
        comments: &str,
    ) -> GraphResult<()> {
        let url = format!("{}/{}/responses", self.items_url(), approval_id);
        let submission = DecisionSubmission {
            response: decision,
            comments: comments.to_string(),
        };

        self.graph
            .post_expecting(
                &url,
                &submission,
                &[StatusCode::OK, StatusCode::CREATED, StatusCode::ACCEPTED],
            )
            .await
    }
}
