//! HTTP client configuration and building logic
//!
//! This module handles the configuration and construction of the HTTP client
//! shared by catalog calls, the token exchange and page downloads.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::constants::{api, http};
use crate::errors::{CatalogError, CatalogResult};

/// Configuration for the catalog client and its HTTP transport
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Catalog API base URL
    pub api_base_url: Url,
    /// OAuth token endpoint
    pub auth_url: Url,
    /// Translated language the chapter aggregate is filtered to
    pub language: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Connection pool idle timeout
    pub pool_idle_timeout: Option<Duration>,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(api::BASE_URL).expect("Base URL constant should be valid"),
            auth_url: Url::parse(api::AUTH_URL).expect("Auth URL constant should be valid"),
            language: api::DEFAULT_LANGUAGE.to_string(),
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            tcp_nodelay: true,
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> CatalogResult<Client> {
        let mut client_builder = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(http::USER_AGENT)
            .tcp_nodelay(self.tcp_nodelay)
            .pool_max_idle_per_host(self.pool_max_per_host);

        if let Some(idle_timeout) = self.pool_idle_timeout {
            client_builder = client_builder.pool_idle_timeout(idle_timeout);
        }

        client_builder.build().map_err(CatalogError::Http)
    }
}

/// Parse a configured URL, reporting which setting was wrong
pub fn parse_url(value: &str) -> CatalogResult<Url> {
    Url::parse(value).map_err(|e| CatalogError::InvalidUrl {
        url: value.to_string(),
        error: e.to_string(),
    })
}
