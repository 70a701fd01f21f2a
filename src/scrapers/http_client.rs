//! HTTP page fetcher for current titles and meta descriptions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

use super::config::ScrapeConfig;
use super::page_meta::parse_page_meta;
use super::PageFetcher;
use crate::models::PageMeta;

/// Reasons a page fetch produced no metadata.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),
}

/// Fetches pages over HTTP and extracts their title and meta description.
#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    /// Create a fetcher from scrape configuration.
    pub fn new(config: &ScrapeConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.resolved_user_agent())
            .timeout(Duration::from_secs(config.request_timeout))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch a page, reporting why it failed.
    pub async fn try_fetch(&self, url: &str) -> Result<PageMeta, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        let response = self.client.get(parsed).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.text().await?;
        Ok(parse_page_meta(&body))
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> PageMeta {
        match self.try_fetch(url).await {
            Ok(meta) => meta,
            Err(e) => {
                debug!("Could not fetch {}: {}", url, e);
                PageMeta::default()
            }
        }
    }
}
