//! Per-ticket outcomes and run tallies.

use apsync_source::TicketId;

/// Terminal state of one ticket after a sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketOutcome {
    /// Ticket status did not match the actionable status; nothing was done.
    SkippedStatus { status: String },

    /// No policy entry for the ticket id; nothing was done.
    SkippedUnmapped,

    /// Full pipeline succeeded: created, located, decision submitted.
    Completed { approval_id: String },

    /// Decision submission failed under the warn-only failure mode. The
    /// ticket counts as processed but the approval is left open remotely.
    CompletedSubmitFailed { approval_id: String, error: String },

    /// Decision submission failed under the abort failure mode.
    SubmitFailed { approval_id: String, error: String },

    /// Approval creation failed; the ticket was abandoned.
    CreateFailed { error: String },

    /// No matching approval was found within the retry budget; someone has
    /// to act on the approval by hand.
    ManualActionRequired,
}

impl TicketOutcome {
    /// Whether the ticket counts as processed (a decision round-trip was at
    /// least attempted against a located approval).
    #[must_use]
    pub fn is_processed(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::CompletedSubmitFailed { .. }
        )
    }

    /// Whether the ticket ended in a failure state.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::SubmitFailed { .. } | Self::CreateFailed { .. } | Self::ManualActionRequired
        )
    }

    /// Whether the ticket was skipped without any remote calls.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::SkippedStatus { .. } | Self::SkippedUnmapped)
    }
}

/// Outcome of one ticket, labelled for reporting.
#[derive(Debug, Clone)]
pub struct TicketResult {
    pub ticket_id: TicketId,
    pub title: String,
    pub outcome: TicketOutcome,
}

/// Aggregated result of a full sync run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub results: Vec<TicketResult>,
}

impl RunSummary {
    pub(crate) fn push(&mut self, result: TicketResult) {
        self.results.push(result);
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn processed(&self) -> usize {
        self.count(TicketOutcome::is_processed)
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(TicketOutcome::is_skipped)
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(TicketOutcome::is_failure)
    }

    #[must_use]
    pub fn manual_action_required(&self) -> usize {
        self.count(|o| matches!(o, TicketOutcome::ManualActionRequired))
    }

    fn count(&self, predicate: impl Fn(&TicketOutcome) -> bool) -> usize {
        self.results
            .iter()
            .filter(|r| predicate(&r.outcome))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_classification() {
        assert!(TicketOutcome::Completed {
            approval_id: "a".into()
        }
        .is_processed());
        assert!(TicketOutcome::CompletedSubmitFailed {
            approval_id: "a".into(),
            error: "e".into()
        }
        .is_processed());
        assert!(TicketOutcome::ManualActionRequired.is_failure());
        assert!(TicketOutcome::SkippedUnmapped.is_skipped());
        assert!(!TicketOutcome::SkippedUnmapped.is_failure());
    }

    #[test]
    fn test_summary_tallies() {
        let mut summary = RunSummary::default();
        summary.push(TicketResult {
            ticket_id: TicketId::Int(1),
            title: "a".into(),
            outcome: TicketOutcome::Completed {
                approval_id: "x".into(),
            },
        });
        summary.push(TicketResult {
            ticket_id: TicketId::Int(2),
            title: "b".into(),
            outcome: TicketOutcome::ManualActionRequired,
        });
        summary.push(TicketResult {
            ticket_id: TicketId::Int(3),
            title: "c".into(),
            outcome: TicketOutcome::SkippedStatus {
                status: "closed".into(),
            },
        });

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.processed(), 1);
        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.manual_action_required(), 1);
    }
}
