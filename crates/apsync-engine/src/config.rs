//! Engine configuration.
//!
//! All tunables live in one explicit value handed to the engine at
//! construction; nothing is read from globals at run time.

use std::time::Duration;

/// What the engine does when a remote write fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Abandon the ticket with a failure outcome.
    AbortTicket,
    /// Log a warning and keep going.
    WarnOnly,
}

/// Tunables for the reconciliation engine.
///
/// The defaults mirror the production deployment: tickets in status `open`
/// are actionable, located approvals must have been created no more than
/// 120 seconds before the create call was issued, and the locate phase makes
/// three attempts five seconds apart.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Ticket status that makes a ticket eligible for processing. Compared
    /// exactly; anything else is skipped untouched.
    pub actionable_status: String,

    /// Tolerance when comparing a located record's creation time against the
    /// moment the create call was issued. Absorbs remote-side creation lag;
    /// widening it raises the odds of matching an unrelated, same-named
    /// approval from an earlier run.
    pub match_window: Duration,

    /// Extra locate attempts after the first one.
    pub locate_retries: u32,

    /// Fixed delay between locate attempts.
    pub locate_delay: Duration,

    /// Failure handling for the create call. The default aborts the ticket:
    /// without a created record there is nothing to locate.
    pub on_create_failure: FailureMode,

    /// Failure handling for decision submission. The default only warns,
    /// leaving the approval open remotely while the ticket still counts as
    /// processed.
    pub on_submit_failure: FailureMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            actionable_status: "open".to_string(),
            match_window: Duration::from_secs(120),
            locate_retries: 2,
            locate_delay: Duration::from_secs(5),
            on_create_failure: FailureMode::AbortTicket,
            on_submit_failure: FailureMode::WarnOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.actionable_status, "open");
        assert_eq!(config.match_window, Duration::from_secs(120));
        assert_eq!(config.locate_retries, 2);
        assert_eq!(config.locate_delay, Duration::from_secs(5));
        assert_eq!(config.on_create_failure, FailureMode::AbortTicket);
        assert_eq!(config.on_submit_failure, FailureMode::WarnOnly);
    }
}
