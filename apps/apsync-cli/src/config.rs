//! Environment-based runtime configuration.
//!
//! Everything tunable lives in explicit environment variables, loaded once
//! at startup into a single value. Variables can come from the process
//! environment or a `.env` file (loaded in `main`).

use secrecy::SecretString;
use std::time::Duration;
use thiserror::Error;

use apsync_engine::{EngineConfig, PolicyMap};
use apsync_graph::DEFAULT_GRAPH_BASE_URL;

/// Configuration loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Which ticket backend to pull from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Unauthenticated JSON feed (`TICKET_FEED_URL`).
    Feed,
    /// Work-order mobile API (`WORKORDER_*` variables).
    WorkOrder,
}

/// Credentials and endpoint for the work-order backend.
#[derive(Debug)]
pub struct WorkOrderSettings {
    pub base_url: String,
    pub username: String,
    pub password: SecretString,
}

/// Full configuration for one batch run.
#[derive(Debug)]
pub struct RunConfig {
    pub graph_client_id: String,
    pub graph_tenant_id: String,
    pub graph_base_url: String,
    pub approver_email: String,
    pub source: SourceKind,
    pub ticket_feed_url: Option<String>,
    pub workorder: Option<WorkOrderSettings>,
    pub policy: PolicyMap,
    pub engine: EngineConfig,
}

impl RunConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// This allows tests to supply variables without mutating process-global
    /// environment state.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let require = |key: &str| reader(key).map_err(|_| ConfigError::MissingVar(key.into()));

        let graph_client_id = require("GRAPH_CLIENT_ID")?;
        let graph_tenant_id = require("GRAPH_TENANT_ID")?;
        let graph_base_url =
            reader("GRAPH_BASE_URL").unwrap_or_else(|_| DEFAULT_GRAPH_BASE_URL.to_string());
        let approver_email = require("APPROVER_EMAIL")?;

        let source = match reader("TICKET_SOURCE")
            .unwrap_or_else(|_| "feed".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "feed" => SourceKind::Feed,
            "workorder" => SourceKind::WorkOrder,
            other => {
                return Err(ConfigError::InvalidValue(
                    "TICKET_SOURCE".into(),
                    format!("expected 'feed' or 'workorder', got '{other}'"),
                ))
            }
        };

        let ticket_feed_url = reader("TICKET_FEED_URL").ok();
        if source == SourceKind::Feed && ticket_feed_url.is_none() {
            return Err(ConfigError::MissingVar("TICKET_FEED_URL".into()));
        }

        let workorder = match source {
            SourceKind::WorkOrder => Some(WorkOrderSettings {
                base_url: require("WORKORDER_BASE_URL")?,
                username: require("WORKORDER_USERNAME")?,
                password: SecretString::from(require("WORKORDER_PASSWORD")?),
            }),
            SourceKind::Feed => None,
        };

        let policy = PolicyMap::parse(&require("POLICY_MAP")?)
            .map_err(|e| ConfigError::InvalidValue("POLICY_MAP".into(), e.to_string()))?;

        let parse_u64 = |key: &str, default: u64| -> Result<u64, ConfigError> {
            match reader(key) {
                Ok(raw) => raw
                    .parse::<u64>()
                    .map_err(|e| ConfigError::InvalidValue(key.into(), e.to_string())),
                Err(_) => Ok(default),
            }
        };

        let engine = EngineConfig {
            actionable_status: reader("ACTIONABLE_STATUS").unwrap_or_else(|_| "open".to_string()),
            match_window: Duration::from_secs(parse_u64("MATCH_WINDOW_SECS", 120)?),
            locate_retries: u32::try_from(parse_u64("LOCATE_RETRIES", 2)?)
                .map_err(|e| ConfigError::InvalidValue("LOCATE_RETRIES".into(), e.to_string()))?,
            locate_delay: Duration::from_secs(parse_u64("LOCATE_DELAY_SECS", 5)?),
            ..EngineConfig::default()
        };

        Ok(Self {
            graph_client_id,
            graph_tenant_id,
            graph_base_url,
            approver_email,
            source,
            ticket_feed_url,
            workorder,
            policy,
            engine,
        })
    }
}
