//! Client configuration

use crate::{ClientError, ClientResult, HttpClient};

/// API host used when `CTP_API_URL` is not set
pub const DEFAULT_API_URL: &str = "https://api.europe-west1.gcp.commercetools.com";

/// Request timeout used when `CTP_TIMEOUT_SECS` is not set
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for connecting to the API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "https://api.europe-west1.gcp.commercetools.com")
    pub api_url: String,

    /// Project every request is scoped to
    pub project_key: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(api_url: impl Into<String>, project_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            project_key: project_key.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from the environment (and a `.env` file if present)
    ///
    /// - `CTP_API_URL` (default [`DEFAULT_API_URL`])
    /// - `CTP_PROJECT_KEY` (required)
    /// - `CTP_ACCESS_TOKEN` (optional)
    /// - `CTP_TIMEOUT_SECS` (default [`DEFAULT_TIMEOUT_SECS`])
    pub fn from_env() -> ClientResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_key = lookup("CTP_PROJECT_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ClientError::Config("CTP_PROJECT_KEY must be set".to_string()))?;

        let api_url = lookup("CTP_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout = match lookup("CTP_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("CTP_TIMEOUT_SECS is not a number: {raw}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let mut config = Self::new(api_url, project_key).with_timeout(timeout);
        if let Some(token) = lookup("CTP_ACCESS_TOKEN").filter(|t| !t.is_empty()) {
            config = config.with_token(token);
        }
        Ok(config)
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<HttpClient> {
        HttpClient::new(self)
    }
}
