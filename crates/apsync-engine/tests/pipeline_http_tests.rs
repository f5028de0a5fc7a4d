//! End-to-end pipeline test: the engine driving the real Graph approvals
//! client against a mock server.

use chrono::{Duration as ChronoDuration, Utc};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use apsync_engine::{EngineConfig, PolicyMap, SyncEngine, TicketOutcome};
use apsync_graph::{
    ApprovalDecision, ApprovalsClient, GraphClient, StaticTokenProvider, UserRef,
};
use apsync_source::{Ticket, TicketId};

const ITEMS_PATH: &str = "/beta/solutions/approval/approvalItems";

#[tokio::test]
async fn full_pipeline_creates_locates_and_decides_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ITEMS_PATH))
        .and(body_json(json!({
            "displayName": "T",
            "description": "Door 4 reader unresponsive (Ticket ID: 2, Status: open)",
            "approvalType": "basic",
            "allowEmailNotification": true,
            "approvers": [
                {"user": {"id": "approver-1", "displayName": "Pat Approver"}}
            ]
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let created = (Utc::now() + ChronoDuration::seconds(1)).to_rfc3339();
    Mock::given(method("GET"))
        .and(path(ITEMS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"id": "a-42", "displayName": "T", "createdDateTime": created}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("{ITEMS_PATH}/a-42/responses")))
        .and(body_json(json!({
            "response": "Approve",
            "comments": "Auto-approve for ticket #2"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let graph = GraphClient::with_base_url(
        Arc::new(StaticTokenProvider::new("test-token")),
        server.uri(),
    )
    .expect("client builds");

    let engine = SyncEngine::new(
        ApprovalsClient::new(graph),
        UserRef {
            id: "approver-1".to_string(),
            display_name: "Pat Approver".to_string(),
        },
        PolicyMap::from_iter([(TicketId::Int(2), ApprovalDecision::Approve)]),
        EngineConfig {
            locate_delay: Duration::from_millis(1),
            ..EngineConfig::default()
        },
    );

    let summary = engine
        .run(&[Ticket {
            id: TicketId::Int(2),
            title: "T".to_string(),
            description: "Door 4 reader unresponsive".to_string(),
            status: "open".to_string(),
        }])
        .await;

    assert_eq!(
        summary.results[0].outcome,
        TicketOutcome::Completed {
            approval_id: "a-42".to_string()
        }
    );
    assert_eq!(summary.processed(), 1);
}
