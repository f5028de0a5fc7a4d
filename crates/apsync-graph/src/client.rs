//! Microsoft Graph HTTP client with bearer injection and pagination.
//!
//! This layer performs single-attempt requests: the only retry loop in the
//! system belongs to the reconciliation engine's locate phase. A request
//! timeout of 10 seconds applies to every call; exceeding it surfaces as a
//! transport error.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::auth::TokenProvider;
use crate::{GraphError, GraphResult};

/// Default Microsoft Graph endpoint.
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.microsoft.com";

/// `OData` error response from Microsoft Graph.
#[derive(Debug, Deserialize)]
pub struct ODataError {
    pub error: ODataErrorBody,
}

/// `OData` error body.
#[derive(Debug, Deserialize)]
pub struct ODataErrorBody {
    pub code: String,
    pub message: String,
    #[serde(rename = "innerError")]
    pub inner_error: Option<serde_json::Value>,
}

/// Response wrapper for paginated Graph API responses.
#[derive(Debug, Deserialize)]
pub struct ODataResponse<T> {
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Microsoft Graph API client.
#[derive(Clone)]
pub struct GraphClient {
    http_client: reqwest::Client,
    token_provider: Arc<dyn TokenProvider>,
    base_url: String,
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GraphClient {
    /// Creates a client against the public Graph endpoint.
    pub fn new(token_provider: Arc<dyn TokenProvider>) -> GraphResult<Self> {
        Self::with_base_url(token_provider, DEFAULT_GRAPH_BASE_URL)
    }

    /// Creates a client against a custom endpoint (used by tests).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_base_url(
        token_provider: Arc<dyn TokenProvider>,
        base_url: impl Into<String>,
    ) -> GraphResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| GraphError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            token_provider,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL Graph requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs a GET request and deserializes a 2xx response body.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> GraphResult<T> {
        let token = self.token_provider.bearer_token().await?;

        let response = self
            .http_client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return response.json().await.map_err(GraphError::from);
        }

        let body = response.text().await.unwrap_or_default();
        Err(api_error(status, &body))
    }

    /// Performs a POST request and accepts only the listed status codes.
    ///
    /// The Approvals API expresses success through specific codes (201/202
    /// for create, 200/201/202 for respond) and the response body is not
    /// useful, so callers declare the accepted set instead of parsing one.
    #[instrument(skip(self, body))]
    pub async fn post_expecting<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        accepted: &[StatusCode],
    ) -> GraphResult<()> {
        let token = self.token_provider.bearer_token().await?;

        let response = self
            .http_client
            .post(url)
            .bearer_auth(&token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if accepted.contains(&status) {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        Err(api_error(status, &text))
    }

    /// Fetches all pages of a paginated response, accumulating every item.
    ///
    /// A failure on any page aborts the whole call and discards partial
    /// results; retrying is the caller's concern.
    #[instrument(skip(self))]
    pub async fn get_all_pages<T: DeserializeOwned>(
        &self,
        initial_url: &str,
    ) -> GraphResult<Vec<T>> {
        let mut url = initial_url.to_string();
        let mut items = Vec::new();

        loop {
            debug!("Fetching page: {}", url);
            let page: ODataResponse<T> = self.get(&url).await?;
            items.extend(page.value);

            match page.next_link {
                Some(next) => url = next,
                None => return Ok(items),
            }
        }
    }
}

/// Decodes an error response, preferring the OData envelope when present.
fn api_error(status: StatusCode, body: &str) -> GraphError {
    if let Ok(odata) = serde_json::from_str::<ODataError>(body) {
        return GraphError::Api {
            code: odata.error.code,
            message: odata.error.message,
            inner_error: odata.error.inner_error.map(|v| v.to_string()),
        };
    }

    GraphError::Api {
        code: status.to_string(),
        message: body.to_string(),
        inner_error: None,
    }
}
