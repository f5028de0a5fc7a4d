//! Common test utilities for apsync-graph integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

use apsync_graph::{ApprovalsClient, GraphClient, StaticTokenProvider};

/// Bearer token used by all mock-server tests.
pub const TEST_TOKEN: &str = "test-token-123";

/// Test data factory for an approval record.
pub fn create_approval_record(id: &str, display_name: &str, created: &str) -> Value {
    json!({
        "id": id,
        "displayName": display_name,
        "createdDateTime": created,
        "result": null,
        "state": "pending"
    })
}

/// Wraps items in an OData response format.
pub fn create_odata_response(items: Vec<Value>, next_link: Option<&str>) -> Value {
    let mut response = json!({ "value": items });
    if let Some(link) = next_link {
        response["@odata.nextLink"] = json!(link);
    }
    response
}

/// Creates an OData error response.
pub fn create_odata_error(code: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}

/// Graph client pointed at a mock server, authenticated with a fixed token.
pub fn graph_client(server: &MockServer) -> GraphClient {
    GraphClient::with_base_url(Arc::new(StaticTokenProvider::new(TEST_TOKEN)), server.uri())
        .expect("client builds")
}

/// Approvals client pointed at a mock server.
pub fn approvals_client(server: &MockServer) -> ApprovalsClient {
    ApprovalsClient::new(graph_client(server))
}
