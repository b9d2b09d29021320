// src/fetch/http.rs
// =============================================================================
// Fetches the page under analysis over HTTP.
//
// Key functionality:
// - Validates the target URL (absolute, http or https)
// - Downloads the body with a shared reqwest client
// - Hands the markup and the effective host to Document::from_url
//
// Any failure here is fatal for the whole analysis: there is no partial
// report without a document.
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use super::document::Document;

/// Why the page under analysis could not be obtained.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme '{scheme}' in '{url}' (expected http or https)")]
    UnsupportedScheme { url: String, scheme: String },
    #[error("request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("reading body of '{url}' failed: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// True when the caller handed us a URL we refuse to fetch at all.
    pub fn is_invalid_target(&self) -> bool {
        matches!(
            self,
            FetchError::InvalidUrl { .. } | FetchError::UnsupportedScheme { .. }
        )
    }
}

/// Anything that can turn a URL into a parsed Document.
///
/// The HTTP implementation is used in production; tests plug in a fake that
/// serves markup from memory.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Document, FetchError>;
}

/// Checks that `url` is something we are willing to fetch.
pub fn parse_target(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim()).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::UnsupportedScheme {
            url: url.to_string(),
            scheme: other.to_string(),
        }),
    }
}

/// Builds the HTTP client shared by the fetcher and every link probe.
///
/// reqwest::Client is a handle to a connection pool, so cloning it is cheap
/// and all clones reuse the same connections.
pub fn build_http_client(request_timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(request_timeout)
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(100)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(30))
        .build()
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        let target = parse_target(url)?;

        let response = self
            .client
            .get(target.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        // Error pages are still pages: a 404 body is analyzed like any other
        let status = response.status();
        let final_url = response.url().clone();
        tracing::debug!(url = %target, final_url = %final_url, status = status.as_u16(), "fetched page");

        let body = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        Ok(Document::from_url(body, &final_url))
    }
}
