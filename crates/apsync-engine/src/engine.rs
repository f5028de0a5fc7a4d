//! The ticket-to-approval reconciliation pipeline.
//!
//! Per ticket the engine runs create, locate, decide in strict order. The
//! create response carries no usable identifier, so the locate phase polls
//! the list endpoint and correlates by display name and creation time. A
//! ticket's failure never touches the rest of the batch: every expected
//! error kind is absorbed at the ticket boundary and reported as an outcome.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument, warn};

use apsync_graph::{ApprovalDecision, ApprovalRequest, UserRef};
use apsync_source::Ticket;

use crate::config::{EngineConfig, FailureMode};
use crate::matcher::ApprovalMatcher;
use crate::outcome::{RunSummary, TicketOutcome, TicketResult};
use crate::policy::PolicyMap;
use crate::service::ApprovalService;

/// Sequential reconciliation engine.
///
/// Holds the shared approver and every tunable for a run; tickets are
/// processed one at a time with no state carried between them.
pub struct SyncEngine<S> {
    service: S,
    approver: UserRef,
    policy: PolicyMap,
    matcher: ApprovalMatcher,
    config: EngineConfig,
}

impl<S: ApprovalService> SyncEngine<S> {
    pub fn new(service: S, approver: UserRef, policy: PolicyMap, config: EngineConfig) -> Self {
        let matcher = ApprovalMatcher::new(config.match_window);
        Self {
            service,
            approver,
            policy,
            matcher,
            config,
        }
    }

    /// Processes the full ticket list and returns one outcome per ticket.
    pub async fn run(&self, tickets: &[Ticket]) -> RunSummary {
        let mut summary = RunSummary::default();

        for ticket in tickets {
            let outcome = self.sync_ticket(ticket).await;
            summary.push(TicketResult {
                ticket_id: ticket.id.clone(),
                title: ticket.title.clone(),
                outcome,
            });
        }

        info!(
            total = summary.total(),
            processed = summary.processed(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            "Sync run finished"
        );

        summary
    }

    /// Runs the pipeline for one ticket.
    #[instrument(skip(self, ticket), fields(ticket_id = %ticket.id))]
    async fn sync_ticket(&self, ticket: &Ticket) -> TicketOutcome {
        if ticket.status != self.config.actionable_status {
            debug!(status = %ticket.status, "Ticket not actionable; skipping");
            return TicketOutcome::SkippedStatus {
                status: ticket.status.clone(),
            };
        }

        let Some(decision) = self.policy.decision_for(&ticket.id) else {
            info!(title = %ticket.title, "No policy entry for ticket; skipping");
            return TicketOutcome::SkippedUnmapped;
        };

        info!(title = %ticket.title, %decision, "Processing ticket");

        let request = ApprovalRequest::basic(
            ticket.title.clone(),
            format!(
                "{} (Ticket ID: {}, Status: {})",
                ticket.description, ticket.id, ticket.status
            ),
            self.approver.clone(),
        );

        // Stamped before the create call goes out: the located record's
        // createdDateTime is compared against this minus the match window,
        // and a slow create would otherwise push the record outside it.
        let post_time = Utc::now();

        if let Err(e) = self.service.create(&request).await {
            match self.config.on_create_failure {
                FailureMode::AbortTicket => {
                    error!(error = %e, "Approval creation failed");
                    return TicketOutcome::CreateFailed {
                        error: e.to_string(),
                    };
                }
                FailureMode::WarnOnly => {
                    warn!(error = %e, "Approval creation failed; attempting to locate anyway");
                }
            }
        } else {
            info!("Approval created; resolving its identifier");
        }

        let Some(approval_id) = self.locate_approval(&ticket.title, post_time).await else {
            warn!(
                title = %ticket.title,
                "No matching approval found within the retry budget; manual action required"
            );
            return TicketOutcome::ManualActionRequired;
        };

        self.submit_decision(&approval_id, ticket, decision).await
    }

    /// Polls the list endpoint until a qualifying record shows up or the
    /// retry budget runs out. A failed list call consumes an attempt like a
    /// miss does.
    async fn locate_approval(
        &self,
        display_name: &str,
        post_time: DateTime<Utc>,
    ) -> Option<String> {
        let attempts = self.config.locate_retries + 1;

        for attempt in 1..=attempts {
            match self.service.list_all().await {
                Ok(records) => {
                    debug!(attempt, count = records.len(), "Listed approvals");
                    if let Some(record) = self.matcher.find_match(&records, display_name, post_time)
                    {
                        info!(
                            approval_id = %record.id,
                            created = %record.created_date_time,
                            "Matched approval"
                        );
                        return Some(record.id.clone());
                    }
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Listing approvals failed");
                }
            }

            if attempt < attempts {
                debug!(
                    attempt,
                    delay_secs = self.config.locate_delay.as_secs(),
                    "No match yet; waiting before next attempt"
                );
                tokio::time::sleep(self.config.locate_delay).await;
            }
        }

        None
    }

    /// Submits the configured decision against a located approval.
    async fn submit_decision(
        &self,
        approval_id: &str,
        ticket: &Ticket,
        decision: ApprovalDecision,
    ) -> TicketOutcome {
        let comments = format!("Auto-{} for ticket #{}", decision.lowercase(), ticket.id);

        match self.service.respond(approval_id, decision, &comments).await {
            Ok(()) => {
                info!(approval_id, %decision, "Decision submitted");
                TicketOutcome::Completed {
                    approval_id: approval_id.to_string(),
                }
            }
            Err(e) => match self.config.on_submit_failure {
                FailureMode::WarnOnly => {
                    warn!(
                        approval_id,
                        error = %e,
                        "Decision submission failed; approval left open"
                    );
                    TicketOutcome::CompletedSubmitFailed {
                        approval_id: approval_id.to_string(),
                        error: e.to_string(),
                    }
                }
                FailureMode::AbortTicket => {
                    error!(approval_id, error = %e, "Decision submission failed");
                    TicketOutcome::SubmitFailed {
                        approval_id: approval_id.to_string(),
                        error: e.to_string(),
                    }
                }
            },
        }
    }
}
