//! Ticket sources for apsync.
//!
//! A ticket source is an external system that hands us a normalized list of
//! tickets to mirror into the approvals workflow. Two deployments exist: a
//! plain JSON feed that already speaks the normalized shape
//! ([`TicketFeedSource`]) and a work-order backend with its own login and
//! response envelope ([`WorkOrderSource`]).
//!
//! Tickets are read once per run and never persisted; a source failure is
//! fatal for the whole run.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

mod error;
mod feed;
mod workorder;

// Re-exports
pub use error::{SourceError, SourceResult};
pub use feed::TicketFeedSource;
pub use workorder::WorkOrderSource;

/// Opaque ticket identifier.
///
/// Sources emit either JSON numbers or strings; both compare and hash by
/// their own representation (the integer `2` and the string `"2"` are
/// distinct identifiers).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TicketId {
    Int(i64),
    Str(String),
}

impl TicketId {
    /// Parses a configuration-file form: numeric text becomes an integer id.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        s.trim()
            .parse::<i64>()
            .map_or_else(|_| Self::Str(s.trim().to_string()), Self::Int)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TicketId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for TicketId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

/// A normalized ticket record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub title: String,
    pub description: String,
    pub status: String,
}

/// A system that produces the tickets to synchronize.
#[async_trait]
pub trait TicketSource: Send + Sync {
    /// Short name for logs and console output.
    fn name(&self) -> &str;

    /// Fetches the full ticket list, normalized to [`Ticket`].
    async fn fetch_tickets(&self) -> SourceResult<Vec<Ticket>>;
}
