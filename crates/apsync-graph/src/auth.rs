//! Device-code OAuth2 authentication for Microsoft Graph.
//!
//! Tokens are cached in memory and reused silently while valid. When no
//! usable token exists, the authenticator falls back to the interactive
//! device-authorization flow: it prints a verification URL and user code,
//! optionally opens the browser, and polls the token endpoint until the user
//! completes sign-in. The wait is bounded only by the lifetime the identity
//! provider assigns to the device code.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::time::Duration as StdDuration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::{GraphError, GraphResult};

/// Default Microsoft identity platform endpoint.
pub const DEFAULT_LOGIN_BASE_URL: &str = "https://login.microsoftonline.com";

/// Scopes required for the approvals workflow. `offline_access` yields a
/// refresh token so later runs can skip the interactive flow.
pub const DEFAULT_SCOPES: &[&str] = &[
    "https://graph.microsoft.com/ApprovalSolution.ReadWrite",
    "https://graph.microsoft.com/User.Read",
    "offline_access",
];

const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Produces a bearer token for Graph requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a valid access token, acquiring one if necessary.
    async fn bearer_token(&self) -> GraphResult<String>;
}

/// Fixed-token provider for tests and pre-acquired credentials.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn bearer_token(&self) -> GraphResult<String> {
        Ok(self.token.clone())
    }
}

/// Response from the device authorization endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceCodeResponse {
    /// Device code used when polling the token endpoint.
    pub device_code: String,

    /// Short code the user types in at the verification URL.
    pub user_code: String,

    /// URL the user must visit.
    pub verification_uri: String,

    /// URL with the user code pre-filled, when the provider supplies one.
    pub verification_uri_complete: Option<String>,

    /// Seconds until the device code expires.
    pub expires_in: u64,

    /// Minimum seconds between polling attempts.
    pub interval: u64,
}

impl DeviceCodeResponse {
    /// URL to open for the user, preferring the pre-filled variant.
    pub fn display_url(&self) -> &str {
        self.verification_uri_complete
            .as_deref()
            .unwrap_or(&self.verification_uri)
    }
}

/// Successful token grant from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    refresh_token: Option<String>,
}

/// OAuth2 error body returned while the device flow is pending or failed.
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    error_description: Option<String>,
}

impl OAuthErrorResponse {
    fn is_authorization_pending(&self) -> bool {
        self.error == "authorization_pending"
    }

    fn is_slow_down(&self) -> bool {
        self.error == "slow_down"
    }

    fn is_access_denied(&self) -> bool {
        self.error == "access_denied"
    }

    fn is_expired_token(&self) -> bool {
        self.error == "expired_token"
    }

    fn description(&self) -> &str {
        self.error_description.as_deref().unwrap_or(&self.error)
    }
}

/// Cached access token.
#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Returns true if the token is expired or will expire within the grace period.
    fn is_expired(&self, grace_period: Duration) -> bool {
        Utc::now() + grace_period >= self.expires_at
    }
}

/// Device-code authenticator with silent token reuse.
///
/// Acquisition order: unexpired cached token, then a refresh-token grant if a
/// prior sign-in returned one, then the interactive device flow.
#[derive(Debug)]
pub struct DeviceAuthenticator {
    client_id: String,
    tenant_id: String,
    login_base_url: String,
    scopes: Vec<String>,
    open_browser: bool,
    http_client: reqwest::Client,
    cached_token: RwLock<Option<CachedToken>>,
    refresh_token: RwLock<Option<String>>,
    /// Grace period before expiry to trigger refresh (default: 5 minutes).
    grace_period: Duration,
}

impl DeviceAuthenticator {
    /// Creates an authenticator against the public Microsoft identity platform.
    pub fn new(client_id: impl Into<String>, tenant_id: impl Into<String>) -> GraphResult<Self> {
        Self::with_login_base_url(client_id, tenant_id, DEFAULT_LOGIN_BASE_URL)
    }

    /// Creates an authenticator against a custom authority endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_login_base_url(
        client_id: impl Into<String>,
        tenant_id: impl Into<String>,
        login_base_url: impl Into<String>,
    ) -> GraphResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(10))
            .build()
            .map_err(|e| GraphError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client_id: client_id.into(),
            tenant_id: tenant_id.into(),
            login_base_url: login_base_url.into().trim_end_matches('/').to_string(),
            scopes: DEFAULT_SCOPES.iter().map(|s| (*s).to_string()).collect(),
            open_browser: true,
            http_client,
            cached_token: RwLock::new(None),
            refresh_token: RwLock::new(None),
            grace_period: Duration::minutes(5),
        })
    }

    /// Disables or enables opening the verification URL in a browser.
    #[must_use]
    pub fn open_browser(mut self, open_browser: bool) -> Self {
        self.open_browser = open_browser;
        self
    }

    /// Overrides the requested scopes.
    #[must_use]
    pub fn scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    fn device_code_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/devicecode",
            self.login_base_url, self.tenant_id
        )
    }

    fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.login_base_url, self.tenant_id
        )
    }

    fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }

    /// Attempts a silent refresh-token grant.
    async fn redeem_refresh_token(&self, refresh_token: &str) -> GraphResult<TokenResponse> {
        let response = self
            .http_client
            .post(self.token_url())
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("scope", &self.scope_param()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::Auth(format!(
                "Refresh token grant failed with status {status}: {body}"
            )));
        }

        response.json().await.map_err(GraphError::from)
    }

    /// Requests a device code from the authorization endpoint.
    async fn request_device_code(&self) -> GraphResult<DeviceCodeResponse> {
        let response = self
            .http_client
            .post(self.device_code_url())
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("scope", &self.scope_param()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::Auth(format!(
                "Failed to request device code: {status} - {body}"
            )));
        }

        response.json().await.map_err(|e| {
            GraphError::Auth(format!("Invalid device code response: {e}"))
        })
    }

    /// Polls the token endpoint once.
    ///
    /// Returns `Ok(Some(token))` when sign-in is complete, `Ok(None)` while
    /// authorization is still pending, or an error on denial/expiry.
    async fn poll_device_token(
        &self,
        device_code: &str,
        interval: &mut StdDuration,
    ) -> GraphResult<Option<TokenResponse>> {
        let response = self
            .http_client
            .post(self.token_url())
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("device_code", device_code),
                ("grant_type", DEVICE_CODE_GRANT),
            ])
            .send()
            .await?;

        if response.status().is_success() {
            let token: TokenResponse = response
                .json()
                .await
                .map_err(|e| GraphError::Auth(format!("Invalid token response: {e}")))?;
            return Ok(Some(token));
        }

        let error: OAuthErrorResponse = response
            .json()
            .await
            .map_err(|e| GraphError::Auth(format!("Invalid error response: {e}")))?;

        if error.is_authorization_pending() {
            return Ok(None);
        }
        if error.is_slow_down() {
            // RFC 8628: back off by 5 seconds when asked.
            *interval += StdDuration::from_secs(5);
            return Ok(None);
        }
        if error.is_access_denied() {
            return Err(GraphError::AuthorizationDenied);
        }
        if error.is_expired_token() {
            return Err(GraphError::DeviceCodeExpired);
        }

        Err(GraphError::Auth(format!(
            "Authentication failed: {}",
            error.description()
        )))
    }

    /// Runs the interactive device flow to completion.
    #[instrument(skip(self))]
    async fn device_flow(&self) -> GraphResult<TokenResponse> {
        let device_code = self.request_device_code().await?;

        println!();
        println!("To sign in, visit:");
        println!("  {}", device_code.verification_uri);
        println!("and enter the code: {}", device_code.user_code);
        println!();

        if self.open_browser {
            if open::that(device_code.display_url()).is_ok() {
                info!("Browser opened; complete sign-in there");
            } else {
                info!("Could not open browser; visit the URL above manually");
            }
        }

        let mut interval = StdDuration::from_secs(device_code.interval);
        let deadline =
            std::time::Instant::now() + StdDuration::from_secs(device_code.expires_in);

        loop {
            if std::time::Instant::now() > deadline {
                return Err(GraphError::DeviceCodeExpired);
            }

            tokio::time::sleep(interval).await;

            if let Some(token) = self
                .poll_device_token(&device_code.device_code, &mut interval)
                .await?
            {
                info!("Device-flow sign-in completed");
                return Ok(token);
            }
            debug!("Authorization still pending");
        }
    }

    /// Acquires a token, preferring silent paths over the interactive flow.
    async fn acquire(&self) -> GraphResult<TokenResponse> {
        let refresh = self.refresh_token.read().await.clone();
        if let Some(refresh_token) = refresh {
            match self.redeem_refresh_token(&refresh_token).await {
                Ok(token) => {
                    debug!("Silently refreshed access token");
                    return Ok(token);
                }
                Err(e) => {
                    warn!(error = %e, "Refresh token grant failed; falling back to device flow");
                }
            }
        }

        self.device_flow().await
    }
}

#[async_trait]
impl TokenProvider for DeviceAuthenticator {
    #[instrument(skip(self), fields(tenant_id = %self.tenant_id))]
    async fn bearer_token(&self) -> GraphResult<String> {
        {
            let cache = self.cached_token.read().await;
            if let Some(ref token) = *cache {
                if !token.is_expired(self.grace_period) {
                    debug!("Using cached token");
                    return Ok(token.access_token.clone());
                }
            }
        }

        let grant = self.acquire().await?;
        let expires_at = Utc::now() + Duration::seconds(grant.expires_in);

        {
            let mut cache = self.cached_token.write().await;
            *cache = Some(CachedToken {
                access_token: grant.access_token.clone(),
                expires_at,
            });
        }
        if grant.refresh_token.is_some() {
            let mut refresh = self.refresh_token.write().await;
            *refresh = grant.refresh_token;
        }

        debug!(
            "Acquired new token, expires at {}",
            expires_at.format("%Y-%m-%d %H:%M:%S UTC")
        );

        Ok(grant.access_token)
    }
}
