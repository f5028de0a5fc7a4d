//! Ticket-to-approval reconciliation engine.
//!
//! The core of apsync. For every actionable, policy-mapped ticket the engine
//! creates a remote approval, locates the record the remote side created for
//! it (the create call returns no durable identifier), and submits the
//! configured decision:
//!
//! ```text
//! create ──► locate (poll + time-window name match) ──► decide
//! ```
//!
//! Known correctness limits, by design of the upstream protocol:
//!
//! - Correlation is heuristic. Matching is by display name and creation
//!   time; a same-named approval created inside the window can be mistaken
//!   for ours.
//! - There is no processed-ticket ledger. Re-running the batch recreates
//!   approvals for tickets that are still actionable and mapped.
//! - A failed decision submission is only warned about by default; the
//!   approval stays open remotely while the ticket counts as processed.

mod config;
mod engine;
mod matcher;
mod outcome;
mod policy;
mod service;

// Re-exports
pub use config::{EngineConfig, FailureMode};
pub use engine::SyncEngine;
pub use matcher::ApprovalMatcher;
pub use outcome::{RunSummary, TicketOutcome, TicketResult};
pub use policy::{PolicyMap, PolicyParseError};
pub use service::ApprovalService;
