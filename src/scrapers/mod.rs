//! Page content fetching.
//!
//! The analysis pipeline only needs each page's current title and meta
//! description. Fetching never fails from the caller's point of view: any
//! problem yields empty strings for that page.

pub mod config;
mod http_client;
pub mod page_meta;

pub use config::{ScrapeConfig, USER_AGENT};
pub use http_client::{FetchError, HttpPageFetcher};
pub use page_meta::parse_page_meta;

use async_trait::async_trait;

use crate::models::PageMeta;

/// Source of a page's current title and meta description.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch metadata for `url`. Failures yield `PageMeta::default()`.
    async fn fetch(&self, url: &str) -> PageMeta;
}
