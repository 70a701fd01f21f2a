//! Page fetcher configuration.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Mobile Safari, the agent most sites serve their canonical head tags to.
pub const USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 13_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/13.1.1 Mobile/15E148 Safari/604.1";

/// Config value that selects a desktop browser agent per run.
pub const IMPERSONATE: &str = "impersonate";

const DESKTOP_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Configuration for fetching current page titles and meta descriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// User agent configuration.
    /// - None: Use the default mobile Safari user agent
    /// - "impersonate": Randomly select from real desktop browser user agents
    /// - Any other string: Use as custom user agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Maximum pages fetched at the same time.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_request_timeout() -> u64 {
    10
}

fn default_concurrency() -> usize {
    4
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            user_agent: None,
            request_timeout: default_request_timeout(),
            concurrency: default_concurrency(),
        }
    }
}

impl ScrapeConfig {
    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `SCRAPE_USER_AGENT`: user agent, or "impersonate"
    /// - `SCRAPE_TIMEOUT`: request timeout in seconds
    /// - `SCRAPE_CONCURRENCY`: parallel page fetches
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("SCRAPE_USER_AGENT") {
            self.user_agent = Some(val);
        }
        if let Ok(val) = std::env::var("SCRAPE_TIMEOUT") {
            if let Ok(n) = val.parse() {
                self.request_timeout = n;
            }
        }
        if let Ok(val) = std::env::var("SCRAPE_CONCURRENCY") {
            if let Ok(n) = val.parse() {
                self.concurrency = n;
            }
        }
        self
    }

    /// The user agent header to send.
    pub fn resolved_user_agent(&self) -> &str {
        match self.user_agent.as_deref().map(str::trim) {
            None | Some("") => USER_AGENT,
            Some(IMPERSONATE) => {
                let seed = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.subsec_nanos() as usize)
                    .unwrap_or(0);
                DESKTOP_AGENTS[seed % DESKTOP_AGENTS.len()]
            }
            Some(custom) => custom,
        }
    }
}
