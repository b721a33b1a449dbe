//! Core HTTP operations for catalog requests
//!
//! Requests are single-shot: a timeout, transport error or non-success
//! status is returned to the caller as a [`CatalogError`] and never retried
//! here. Spacing between calls is the governor's job, not this module's.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::errors::{CatalogError, CatalogResult};

/// HTTP operations handler for JSON catalog endpoints
#[derive(Debug, Clone)]
pub struct HttpHandler {
    client: Client,
    request_timeout: Duration,
    bearer_token: Option<String>,
}

impl HttpHandler {
    /// Creates a new HttpHandler around an already configured client
    pub fn new(client: Client, request_timeout: Duration) -> Self {
        Self {
            client,
            request_timeout,
            bearer_token: None,
        }
    }

    /// Attach a bearer token to every subsequent catalog request
    pub fn set_bearer_token(&mut self, token: impl Into<String>) {
        self.bearer_token = Some(token.into());
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }

    /// Fetches `url` and returns the body of a successful response
    ///
    /// `context` names the endpoint in log messages.
    pub async fn get_text(&self, url: &Url, context: &'static str) -> CatalogResult<String> {
        let mut request = self.client.get(url.as_str());
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(url, e))?;
        tracing::debug!("Fetched {} ({} bytes): {}", context, body.len(), url);
        Ok(body)
    }

    /// Get a reference to the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    fn classify(&self, url: &Url, error: reqwest::Error) -> CatalogError {
        if error.is_timeout() {
            CatalogError::Timeout {
                url: url.to_string(),
                seconds: self.request_timeout.as_secs(),
            }
        } else {
            CatalogError::Http(error)
        }
    }
}
