//! Seam between the engine and the remote approvals API.

use async_trait::async_trait;

use apsync_graph::{
    ApprovalDecision, ApprovalRecord, ApprovalRequest, ApprovalsClient, GraphResult,
};

/// The three remote operations the reconciliation protocol needs.
///
/// Implemented by the Graph client for production and by scripted fakes in
/// engine tests.
#[async_trait]
pub trait ApprovalService: Send + Sync {
    /// Creates an approval item; the remote record appears asynchronously.
    async fn create(&self, request: &ApprovalRequest) -> GraphResult<()>;

    /// Lists every approval item, fully paginated.
    async fn list_all(&self) -> GraphResult<Vec<ApprovalRecord>>;

    /// Submits a decision against a located approval item.
    async fn respond(
        &self,
        approval_id: &str,
        decision: ApprovalDecision,
        comments: &str,
    ) -> GraphResult<()>;
}

#[async_trait]
impl ApprovalService for ApprovalsClient {
    async fn create(&self, request: &ApprovalRequest) -> GraphResult<()> {
        ApprovalsClient::create(self, request).await
    }

    async fn list_all(&self) -> GraphResult<Vec<ApprovalRecord>> {
        ApprovalsClient::list_all(self).await
    }

    async fn respond(
        &self,
        approval_id: &str,
        decision: ApprovalDecision,
        comments: &str,
    ) -> GraphResult<()> {
        ApprovalsClient::respond(self, approval_id, decision, comments).await
    }
}
