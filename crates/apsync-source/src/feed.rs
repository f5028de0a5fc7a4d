//! Plain JSON ticket feed.
//!
//! The feed endpoint returns a bare JSON array already in the normalized
//! ticket shape, with no authentication.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{SourceError, SourceResult, Ticket, TicketSource};

/// Ticket source backed by an unauthenticated JSON feed.
#[derive(Debug, Clone)]
pub struct TicketFeedSource {
    endpoint: String,
    http_client: reqwest::Client,
}

impl TicketFeedSource {
    /// Creates a feed source for the given endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(endpoint: impl Into<String>) -> SourceResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SourceError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            endpoint: endpoint.into(),
            http_client,
        })
    }
}

#[async_trait]
impl TicketSource for TicketFeedSource {
    fn name(&self) -> &str {
        "ticket-feed"
    }

    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn fetch_tickets(&self) -> SourceResult<Vec<Ticket>> {
        let response = self.http_client.get(&self.endpoint).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let tickets: Vec<Ticket> = response.json().await?;
        debug!(count = tickets.len(), "Fetched tickets from feed");
        Ok(tickets)
    }
}
