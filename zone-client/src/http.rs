//! Blocking HTTP transport for API calls

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::ErrorResponse;

use crate::request::ApiRequest;
use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for making blocking requests to the API
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        let base_url = Url::parse(config.api_url.trim_end_matches('/'))
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", config.api_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(config.api_url.clone()));
        }

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build authorization header value
    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Append path segments and query pairs to the base URL
    pub(crate) fn url(&self, segments: &[String], query: &[(String, String)]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Send one request; no retries
    pub(crate) fn execute<T, B>(&self, request: &ApiRequest<T, B>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.url(&request.segments, &request.query)?;
        tracing::debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self.client.request(request.method.clone(), url.clone());
        if let Some(auth) = self.auth_header() {
            builder = builder.header(reqwest::header::AUTHORIZATION, auth);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().inspect_err(|e| {
            tracing::warn!(method = %request.method, url = %url, error = %e, "Request failed");
        })?;

        Self::handle_response(response)
    }

    /// Handle the HTTP response
    fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            tracing::warn!(status = %status, "API returned an error response");
            // Prefer the structured error body
            if let Ok(api_err) = serde_json::from_str::<ErrorResponse>(&text) {
                return Err(ClientError::Api {
                    status,
                    message: api_err.message,
                    errors: api_err.errors,
                });
            }
            return match status {
                StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
                StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
                _ => Err(ClientError::Unexpected { status, body: text }),
            };
        }

        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(ClientError::InvalidResponse(format!(
                "empty body with status {status}"
            )));
        }

        serde_json::from_str(trimmed).map_err(Into::into)
    }
}
