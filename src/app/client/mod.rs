//! HTTP client implementation for MangaDex catalog interaction
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: single-shot HTTP operations with timeout classification
//! - `responses`: wire formats and their conversion into models
//!
//! [`CatalogApi`] is the seam the pipeline depends on; [`MangaDexClient`] is
//! its production implementation.

use std::future::Future;

use reqwest::Client;
use url::Url;

use crate::app::models::{ChapterRef, ImageHandshake, SearchResult};
use crate::errors::{CatalogError, CatalogResult};

pub mod config;
pub mod http;
pub mod responses;

pub use config::ClientConfig;

use http::HttpHandler;

/// Operations the pipeline needs from a manga catalog
///
/// Implementations report failures as errors; deciding how to degrade is
/// left to the caller.
pub trait CatalogApi: Send + Sync {
    /// Search manga by free-text title
    fn search_manga(
        &self,
        title: &str,
    ) -> impl Future<Output = CatalogResult<Vec<SearchResult>>> + Send;

    /// List every chapter of a manga in the configured language
    fn chapter_aggregate(
        &self,
        manga_id: &str,
    ) -> impl Future<Output = CatalogResult<Vec<ChapterRef>>> + Send;

    /// Ask the image server where a chapter's pages can be fetched
    fn image_handshake(
        &self,
        chapter_id: &str,
    ) -> impl Future<Output = CatalogResult<ImageHandshake>> + Send;
}

/// HTTP client for the MangaDex catalog API
#[derive(Debug, Clone)]
pub struct MangaDexClient {
    http_handler: HttpHandler,
    base_url: Url,
    language: String,
}

impl MangaDexClient {
    /// Creates an anonymous client from the given configuration
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the HTTP client cannot be built
    pub fn new(config: &ClientConfig) -> CatalogResult<Self> {
        let client = config.build_http_client()?;
        let http_handler = HttpHandler::new(client, config.request_timeout);

        tracing::debug!("Created catalog client for {}", config.api_base_url);

        Ok(Self {
            http_handler,
            base_url: config.api_base_url.clone(),
            language: config.language.clone(),
        })
    }

    /// Attach a bearer token obtained from the token exchange
    pub fn set_bearer_token(&mut self, token: impl Into<String>) {
        self.http_handler.set_bearer_token(token);
    }

    pub fn is_authenticated(&self) -> bool {
        self.http_handler.is_authenticated()
    }

    /// Underlying HTTP client, shared with the token exchange and page fetcher
    pub fn http_client(&self) -> &Client {
        self.http_handler.client()
    }

    /// Get the base URL for the catalog API
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> CatalogResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::InvalidUrl {
                url: self.base_url.to_string(),
                error: "base URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn search_url(&self, title: &str) -> CatalogResult<Url> {
        let mut url = self.endpoint(&["manga"])?;
        url.query_pairs_mut().append_pair("title", title);
        Ok(url)
    }

    fn aggregate_url(&self, manga_id: &str) -> CatalogResult<Url> {
        let mut url = self.endpoint(&["manga", manga_id, "aggregate"])?;
        url.query_pairs_mut()
            .append_pair("translatedLanguage[]", &self.language);
        Ok(url)
    }

    fn handshake_url(&self, chapter_id: &str) -> CatalogResult<Url> {
        self.endpoint(&["at-home", "server", chapter_id])
    }
}

impl CatalogApi for MangaDexClient {
    async fn search_manga(&self, title: &str) -> CatalogResult<Vec<SearchResult>> {
        let url = self.search_url(title)?;
        let body = self.http_handler.get_text(&url, "search").await?;
        responses::parse_search(&body)
    }

    async fn chapter_aggregate(&self, manga_id: &str) -> CatalogResult<Vec<ChapterRef>> {
        let url = self.aggregate_url(manga_id)?;
        let body = self.http_handler.get_text(&url, "aggregate").await?;
        responses::parse_aggregate(&body)
    }

    async fn image_handshake(&self, chapter_id: &str) -> CatalogResult<ImageHandshake> {
        let url = self.handshake_url(chapter_id)?;
        let body = self.http_handler.get_text(&url, "handshake").await?;
        responses::parse_handshake(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base: &str) -> MangaDexClient {
        let config = ClientConfig {
            api_base_url: Url::parse(base).unwrap(),
            ..Default::default()
        };
        MangaDexClient::new(&config).unwrap()
    }

    #[test]
    fn test_search_url_encodes_title() {
        let client = client_for("https://api.mangadex.org");
        let url = client.search_url("Foo & Bar").unwrap();
        assert_eq!(url.path(), "/manga");
        assert_eq!(url.query(), Some("title=Foo+%26+Bar"));
    }

    #[test]
    fn test_aggregate_url_filters_language() {
        let client = client_for("https://api.mangadex.org");
        let url = client.aggregate_url("a1").unwrap();
        assert_eq!(url.path(), "/manga/a1/aggregate");
        assert_eq!(url.query(), Some("translatedLanguage%5B%5D=en"));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client_for("http://localhost:8080/api/");
        let url = client.handshake_url("c1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/at-home/server/c1");
    }

    #[test]
    fn test_client_starts_anonymous() {
        let mut client = client_for("https://api.mangadex.org");
        assert!(!client.is_authenticated());
        client.set_bearer_token("abc");
        assert!(client.is_authenticated());
    }
}
