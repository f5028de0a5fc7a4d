//! Work-order ("uniform request") ticket source.
//!
//! This backend requires a username/password login that yields a bearer
//! token, and wraps its payloads in a `{status, message, data}` envelope.
//! Records are normalized into the common ticket shape here so the rest of
//! the system never sees work-order field names.

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{SourceError, SourceResult, Ticket, TicketId, TicketSource};

const LOGIN_PATH: &str = "/api/mobile/v3.0/login";
const REQUESTS_PATH: &str = "/api/mobile/v3.0/uniform-requests/all";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// Response envelope used by every work-order endpoint.
#[derive(Debug, Deserialize)]
struct RequestEnvelope {
    status: String,
    message: Option<String>,
    #[serde(default)]
    data: Vec<UniformRequest>,
}

/// Raw work-order record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UniformRequest {
    request_id: i64,
    technician_name: String,
    notes: Option<String>,
    status: String,
}

impl UniformRequest {
    fn into_ticket(self) -> Ticket {
        Ticket {
            id: TicketId::Int(self.request_id),
            title: format!(
                "Uniform Request #{} by {}",
                self.request_id, self.technician_name
            ),
            description: self
                .notes
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "No notes provided".to_string()),
            status: self.status,
        }
    }
}

/// Ticket source backed by the work-order mobile API.
#[derive(Debug, Clone)]
pub struct WorkOrderSource {
    base_url: String,
    username: String,
    password: SecretString,
    http_client: reqwest::Client,
}

impl WorkOrderSource {
    /// Creates a work-order source.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
    ) -> SourceResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| SourceError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password,
            http_client,
        })
    }

    /// Logs in and returns the backend's bearer token.
    async fn login(&self) -> SourceResult<String> {
        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, LOGIN_PATH))
            .json(&LoginRequest {
                username: &self.username,
                password: self.password.expose_secret(),
            })
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Auth(format!(
                "Login failed: {status} - {body}"
            )));
        }

        let login: LoginResponse = response.json().await?;
        login
            .token
            .ok_or_else(|| SourceError::Auth("No token found in login response".to_string()))
    }
}

#[async_trait]
impl TicketSource for WorkOrderSource {
    fn name(&self) -> &str {
        "work-orders"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_tickets(&self) -> SourceResult<Vec<Ticket>> {
        let token = self.login().await?;
        debug!("Logged in to work-order backend");

        let response = self
            .http_client
            .get(format!("{}{}", self.base_url, REQUESTS_PATH))
            .bearer_auth(&token)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let envelope: RequestEnvelope = response.json().await?;
        if envelope.status != "OK" {
            return Err(SourceError::Rejected(
                envelope
                    .message
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        let tickets: Vec<Ticket> = envelope
            .data
            .into_iter()
            .map(UniformRequest::into_ticket)
            .collect();
        debug!(count = tickets.len(), "Fetched work-order tickets");
        Ok(tickets)
    }
}
