//! Approver resolution via the Graph users endpoint.

use serde::Deserialize;
use tracing::{info, instrument};

use crate::approvals::UserRef;
use crate::client::GraphClient;
use crate::GraphResult;

/// Subset of the Graph user resource we need.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserResponse {
    id: String,
    display_name: Option<String>,
}

/// Looks up the approver account by email address.
///
/// The display name falls back to the email when Graph omits it.
#[instrument(skip(graph))]
pub async fn resolve_approver(graph: &GraphClient, email: &str) -> GraphResult<UserRef> {
    let url = format!("{}/v1.0/users/{}", graph.base_url(), email);
    let user: UserResponse = graph.get(&url).await?;

    info!(user_id = %user.id, "Resolved approver");

    Ok(UserRef {
        id: user.id,
        display_name: user.display_name.unwrap_or_else(|| email.to_string()),
    })
}
