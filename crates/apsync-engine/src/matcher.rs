//! Correlation of created approvals by name and creation time.
//!
//! The create endpoint returns no durable identifier, so the engine has to
//! recognize its own record in a later list response. The correlation is a
//! heuristic: display-name equality plus a creation-time window anchored at
//! the moment the create call was issued. A same-named approval created by
//! someone else inside the window would be mistaken for ours; nothing in the
//! wire contract rules that out.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::time::Duration;

use apsync_graph::ApprovalRecord;

/// Time-window + name matching strategy.
#[derive(Debug, Clone)]
pub struct ApprovalMatcher {
    window: ChronoDuration,
}

impl ApprovalMatcher {
    /// Creates a matcher with the given tolerance window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window: ChronoDuration::from_std(window).unwrap_or(ChronoDuration::MAX),
        }
    }

    /// Selects the record belonging to an approval created at `post_time`
    /// under the given display name.
    ///
    /// Accepts the FIRST record in list order whose name matches
    /// case-insensitively and whose `createdDateTime` is no earlier than
    /// `post_time - window`. Deliberately not the closest or most recent
    /// match: the selection must be deterministic across repeated list
    /// responses with identical content.
    #[must_use]
    pub fn find_match<'a>(
        &self,
        records: &'a [ApprovalRecord],
        display_name: &str,
        post_time: DateTime<Utc>,
    ) -> Option<&'a ApprovalRecord> {
        let earliest = post_time - self.window;
        let wanted = display_name.to_lowercase();

        records
            .iter()
            .find(|record| {
                record.display_name.to_lowercase() == wanted
                    && record.created_date_time >= earliest
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str, created: DateTime<Utc>) -> ApprovalRecord {
        ApprovalRecord {
            id: id.to_string(),
            display_name: name.to_string(),
            created_date_time: created,
        }
    }

    fn matcher(window_secs: u64) -> ApprovalMatcher {
        ApprovalMatcher::new(Duration::from_secs(window_secs))
    }

    #[test]
    fn test_matches_record_created_after_post_time() {
        let post = Utc::now();
        let records = vec![record("a-1", "Ticket T", post + ChronoDuration::seconds(1))];

        let found = matcher(120).find_match(&records, "Ticket T", post);
        assert_eq!(found.map(|r| r.id.as_str()), Some("a-1"));
    }

    #[test]
    fn test_name_comparison_is_case_insensitive() {
        let post = Utc::now();
        let records = vec![record("a-1", "TICKET t", post + ChronoDuration::seconds(1))];

        let found = matcher(120).find_match(&records, "ticket T", post);
        assert!(found.is_some());
    }

    #[test]
    fn test_rejects_record_older_than_window() {
        let post = Utc::now();
        let records = vec![record(
            "a-old",
            "Ticket T",
            post - ChronoDuration::seconds(121),
        )];

        assert!(matcher(120).find_match(&records, "Ticket T", post).is_none());
    }

    #[test]
    fn test_accepts_record_just_inside_window() {
        let post = Utc::now();
        let records = vec![record(
            "a-edge",
            "Ticket T",
            post - ChronoDuration::seconds(119),
        )];

        assert!(matcher(120).find_match(&records, "Ticket T", post).is_some());
    }

    #[test]
    fn test_rejects_name_mismatch() {
        let post = Utc::now();
        let records = vec![record("a-1", "Other", post + ChronoDuration::seconds(1))];

        assert!(matcher(120).find_match(&records, "Ticket T", post).is_none());
    }

    #[test]
    fn test_first_qualifying_match_in_list_order_wins() {
        let post = Utc::now();
        let records = vec![
            record("a-old", "Ticket T", post - ChronoDuration::seconds(500)),
            record("a-first", "Ticket T", post + ChronoDuration::seconds(30)),
            record("a-closer", "Ticket T", post + ChronoDuration::seconds(1)),
        ];

        // a-old is outside the window; a-first qualifies and is listed before
        // a-closer, so it wins even though a-closer was created nearer to
        // post_time.
        let found = matcher(120).find_match(&records, "Ticket T", post);
        assert_eq!(found.map(|r| r.id.as_str()), Some("a-first"));
    }

    #[test]
    fn test_matching_is_deterministic() {
        let post = Utc::now();
        let records = vec![
            record("a-1", "Ticket T", post + ChronoDuration::seconds(2)),
            record("a-2", "Ticket T", post + ChronoDuration::seconds(3)),
        ];

        let m = matcher(120);
        let first = m.find_match(&records, "Ticket T", post).map(|r| r.id.clone());
        for _ in 0..10 {
            let again = m.find_match(&records, "Ticket T", post).map(|r| r.id.clone());
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_empty_list_yields_no_match() {
        assert!(matcher(120).find_match(&[], "Ticket T", Utc::now()).is_none());
    }
}
