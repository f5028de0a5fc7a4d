//! Static decision policy keyed by ticket id.

use std::collections::HashMap;
use thiserror::Error;

use apsync_graph::ApprovalDecision;
use apsync_source::TicketId;

/// Error parsing a policy specification string.
#[derive(Debug, Error)]
pub enum PolicyParseError {
    /// An entry was not of the form `id=decision`.
    #[error("Invalid policy entry '{0}', expected 'id=decision'")]
    InvalidEntry(String),

    /// The decision part was neither `approve` nor `reject`.
    #[error("Unknown decision '{0}', expected 'approve' or 'reject'")]
    UnknownDecision(String),
}

/// Lookup from ticket id to the decision to auto-submit.
///
/// Tickets without an entry are skipped entirely, even when actionable.
#[derive(Debug, Clone, Default)]
pub struct PolicyMap {
    entries: HashMap<TicketId, ApprovalDecision>,
}

impl PolicyMap {
    /// Parses a comma-separated specification such as `2=approve,3=reject`.
    /// Numeric ids are treated as integer ticket ids.
    pub fn parse(spec: &str) -> Result<Self, PolicyParseError> {
        let mut entries = HashMap::new();

        for part in spec.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            let (id, decision) = part
                .split_once('=')
                .ok_or_else(|| PolicyParseError::InvalidEntry(part.to_string()))?;

            let decision = decision
                .trim()
                .parse::<ApprovalDecision>()
                .map_err(|_| PolicyParseError::UnknownDecision(decision.trim().to_string()))?;

            entries.insert(TicketId::parse(id), decision);
        }

        Ok(Self { entries })
    }

    /// Returns the configured decision for a ticket, if any.
    #[must_use]
    pub fn decision_for(&self, id: &TicketId) -> Option<ApprovalDecision> {
        self.entries.get(id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(TicketId, ApprovalDecision)> for PolicyMap {
    fn from_iter<I: IntoIterator<Item = (TicketId, ApprovalDecision)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spec() {
        let policy = PolicyMap::parse("2=approve, 3=reject").unwrap();
        assert_eq!(policy.len(), 2);
        assert_eq!(
            policy.decision_for(&TicketId::Int(2)),
            Some(ApprovalDecision::Approve)
        );
        assert_eq!(
            policy.decision_for(&TicketId::Int(3)),
            Some(ApprovalDecision::Reject)
        );
        assert_eq!(policy.decision_for(&TicketId::Int(4)), None);
    }

    #[test]
    fn test_parse_string_ids() {
        let policy = PolicyMap::parse("REQ-7=reject").unwrap();
        assert_eq!(
            policy.decision_for(&TicketId::Str("REQ-7".to_string())),
            Some(ApprovalDecision::Reject)
        );
    }

    #[test]
    fn test_parse_empty_spec() {
        let policy = PolicyMap::parse("").unwrap();
        assert!(policy.is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_entry() {
        assert!(matches!(
            PolicyMap::parse("2approve"),
            Err(PolicyParseError::InvalidEntry(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_decision() {
        assert!(matches!(
            PolicyMap::parse("2=maybe"),
            Err(PolicyParseError::UnknownDecision(_))
        ));
    }
}
