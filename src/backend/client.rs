//! REST client for the managed backend.
//!
//! Talks to a PostgREST endpoint (`/rest/v1/<table>`) and returns raw JSON
//! rows. Timeouts and retries are handled here so callers never see them.

use crate::backend::query::QueryKey;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced by a backend read.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {table} timed out after {seconds}s")]
    Timeout { table: String, seconds: u64 },

    #[error("Cannot connect to backend at {0}")]
    Connect(String),

    #[error("Backend error {status} reading {table}: {body}")]
    Status {
        table: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode rows from {table}: {message}")]
    Decode { table: String, message: String },

    #[error("Expected at most one row from {table}, got {count}")]
    MultipleRows { table: String, count: usize },

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Backend timeout must be at least 1 second")]
    ZeroTimeout,

    #[error("Request failed: {0}")]
    Request(String),
}

impl FetchError {
    /// Transport failures worth another attempt. HTTP error statuses are not retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Timeout { .. } | FetchError::Connect(_))
    }
}

/// Connection settings for [`RestClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Project URL, without the `/rest/v1` suffix.
    pub base_url: String,
    /// Sent as both `apikey` and bearer token.
    pub api_key: String,
    pub timeout_seconds: u64,
    /// Extra attempts after a timeout or connection failure.
    pub retries: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            timeout_seconds: 30,
            retries: 2,
        }
    }
}

impl From<&crate::config::BackendConfig> for ClientConfig {
    fn from(config: &crate::config::BackendConfig) -> Self {
        Self {
            base_url: config.url.clone(),
            api_key: config.api_key.clone(),
            timeout_seconds: config.timeout_seconds,
            retries: config.retries,
        }
    }
}

/// Read-only client for the backend's REST interface.
pub struct RestClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl RestClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(FetchError::InvalidUrl(config.base_url));
        }
        if config.timeout_seconds == 0 {
            return Err(FetchError::ZeroTimeout);
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Full URL of a table endpoint.
    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.config.base_url.trim_end_matches('/'), table)
    }

    /// Run a query and return its rows, retrying transport failures.
    pub async fn fetch_rows(&self, key: &QueryKey) -> Result<Vec<Value>, FetchError> {
        with_retries(self.config.retries, || self.send(key)).await
    }

    async fn send(&self, key: &QueryKey) -> Result<Vec<Value>, FetchError> {
        let table = key.table();
        let url = self.table_url(table);

        debug!("GET {} {}", url, key);

        let response = self
            .http_client
            .get(&url)
            .query(&key.params())
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        table: table.to_string(),
                        seconds: self.config.timeout_seconds,
                    }
                } else if e.is_connect() {
                    FetchError::Connect(self.config.base_url.clone())
                } else {
                    FetchError::Request(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                table: table.to_string(),
                status,
                body,
            });
        }

        let rows: Vec<Value> = response.json().await.map_err(|e| FetchError::Decode {
            table: table.to_string(),
            message: e.to_string(),
        })?;

        debug!("{} returned {} rows", key, rows.len());

        if key.is_single() && rows.len() > 1 {
            return Err(FetchError::MultipleRows {
                table: table.to_string(),
                count: rows.len(),
            });
        }

        Ok(rows)
    }
}

/// Run `attempt` until it succeeds, fails with a non-retryable error, or
/// `retries` extra attempts are used up. Backoff grows by 250ms per attempt.
async fn with_retries<T, F, Fut>(retries: usize, mut attempt: F) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut retried = 0;

    loop {
        match attempt().await {
            Err(e) if e.is_retryable() && retried < retries => {
                retried += 1;
                warn!("{} (attempt {}/{}), retrying", e, retried, retries + 1);
                tokio::time::sleep(Duration::from_millis(250 * retried as u64)).await;
            }
            result => return result,
        }
    }
}
