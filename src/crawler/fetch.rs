use async_trait::async_trait;
use log2::debug;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use super::config::LINK_REQUEST_TIMEOUT_SEC;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid link {link}: {source}")]
    InvalidUrl {
        link: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP error for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to fetch page {url}: {status}")]
    Status { url: String, status: StatusCode },
}

/// A fetched page: where the request ended up after redirects, and its markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub final_url: String,
    pub body: String,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError>;
}

/// If `path` is a full URL, returns it as-is. Otherwise joins it onto `root_url`.
pub fn construct_url(path: &str, root_url: &Url) -> Result<Url, url::ParseError> {
    match Url::parse(path) {
        Ok(parsed_url) if parsed_url.host().is_some() => Ok(parsed_url),
        _ => root_url.join(path),
    }
}

/// Fetches pages over HTTP, following redirects
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(request_timeout_sec: u64) -> Self {
        Self::with_client(Client::new(), request_timeout_sec)
    }

    pub fn with_client(client: Client, request_timeout_sec: u64) -> Self {
        Self {
            client,
            timeout: Duration::from_secs(request_timeout_sec),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(LINK_REQUEST_TIMEOUT_SEC)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| FetchError::Request { url: url.to_string(), source })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Request { url: url.to_string(), source })?;

        debug!("Fetched {} ({} bytes) resolved to {}", url, body.len(), final_url);

        Ok(Page { final_url, body })
    }
}
