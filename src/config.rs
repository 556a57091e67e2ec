//! Settings for the shared HTTP client.

use crate::error::{FetchError, Result};
use std::time::Duration;

/// Browser-like user agent sent with every source request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`crate::retriever::ArticleRetriever`]
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// Proxy URL (e.g., "http://127.0.0.1:7890")
    pub proxy: Option<String>,
    /// Keep cookies between requests
    pub cookie_store: bool,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            proxy: None,
            cookie_store: true,
        }
    }
}

impl RetrieverConfig {
    /// Build the HTTP client described by this configuration.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().cookie_store(self.cookie_store);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(proxy_url) = &self.proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                FetchError::Config(format!("Invalid proxy URL '{}': {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        builder
            .build()
            .map_err(|e| FetchError::Config(format!("Failed to build HTTP client: {}", e)))
    }
}
