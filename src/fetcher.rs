//! Source fetcher abstraction.
//!
//! A fetcher knows how to query one external source and turn the first hit
//! into an [`Article`]. New sources are added by implementing [`Fetcher`] and
//! registering the value with the retriever; the retriever itself does not
//! change.

use crate::article::Article;
use crate::config::USER_AGENT;
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Build the search URL for `query`. Pure and deterministic.
    fn build_query(&self, query: &str) -> Url;

    /// Fetch the search page for `query` and extract its first result.
    ///
    /// Returns `Ok(None)` when the source has nothing usable. `Err` is
    /// reserved for transport faults.
    async fn fetch_and_extract(&self, client: &Client, query: &str) -> Result<Option<Article>>;
}

/// Parse a base origin given to a fetcher constructor.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| FetchError::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;
    if url.cannot_be_a_base() {
        return Err(FetchError::Config(format!("Invalid base URL '{}'", base_url)));
    }
    Ok(url)
}

/// Join `path` onto `base` and append the encoded query pairs.
pub(crate) fn search_url(base: &Url, path: &str, pairs: &[(&str, &str)]) -> Url {
    let mut url = base.clone();
    let joined = format!("{}/{}", base.path().trim_end_matches('/'), path);
    url.set_path(&joined);
    url.set_query(None);
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs.iter().copied());
    }
    url
}

/// GET `url` with the identification header and return the body text.
pub(crate) async fn fetch_text(client: &Client, url: &Url) -> Result<String> {
    debug!(url = %url, "Fetching page");

    let response = client
        .get(url.as_str())
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await?;

    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited(60));
    }

    if !status.is_success() {
        return Err(FetchError::Api {
            code: status.as_u16(),
            message: format!("HTTP error: {}", status),
        });
    }

    response.text().await.map_err(FetchError::Network)
}
