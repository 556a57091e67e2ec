//! Concurrent retrieval across all registered fetchers.
//!
//! [`ArticleRetriever`] owns the single HTTP client shared by every fetcher.
//! A query is fanned out to all fetchers at once on the calling task and the
//! results are gathered back in registration order, one slot per fetcher.

use crate::article::Article;
use crate::config::RetrieverConfig;
use crate::error::{FetchError, Result};
use crate::fetcher::Fetcher;
use futures::future::join_all;
use reqwest::Client;
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Fans a query out to every fetcher and gathers one slot per fetcher.
pub struct ArticleRetriever {
    fetchers: Vec<Arc<dyn Fetcher>>,
    config: RetrieverConfig,
    client: Option<Client>,
    sessions_opened: usize,
}

impl ArticleRetriever {
    /// Create a retriever over `fetchers`. The client is not built until
    /// [`open`](Self::open) is called.
    pub fn new(fetchers: Vec<Arc<dyn Fetcher>>, config: RetrieverConfig) -> Self {
        Self {
            fetchers,
            config,
            client: None,
            sessions_opened: 0,
        }
    }

    /// Build the shared client. A second call keeps the existing one.
    pub fn open(&mut self) -> Result<()> {
        if self.client.is_some() {
            debug!("HTTP client already open");
            return Ok(());
        }

        self.client = Some(self.config.build_client()?);
        self.sessions_opened += 1;
        info!(fetchers = self.fetchers.len(), "Opened HTTP client");
        Ok(())
    }

    /// Open the client and return a guard that closes it when dropped.
    pub fn session(&mut self) -> Result<RetrieverSession<'_>> {
        self.open()?;
        Ok(RetrieverSession { retriever: self })
    }

    /// Drop the shared client and its pooled connections. No-op when closed.
    pub fn close(&mut self) {
        if self.client.take().is_some() {
            info!("Closed HTTP client");
        }
    }

    pub fn is_open(&self) -> bool {
        self.client.is_some()
    }

    pub fn fetcher_count(&self) -> usize {
        self.fetchers.len()
    }

    /// Number of HTTP clients built over this retriever's lifetime
    pub fn sessions_opened(&self) -> usize {
        self.sessions_opened
    }

    /// Run `query` against every fetcher concurrently.
    ///
    /// The returned vector has one entry per fetcher, in registration order.
    /// A fetcher that fails at the transport level is logged and yields
    /// `None`; it never aborts the others.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotInitialized`] if the client is not open.
    pub async fn fetch(&self, query: &str) -> Result<Vec<Option<Article>>> {
        let client = self.client.as_ref().ok_or(FetchError::NotInitialized)?;

        info!(query = query, fetchers = self.fetchers.len(), "Fetching articles");

        let tasks = self.fetchers.iter().map(|fetcher| async move {
            match fetcher.fetch_and_extract(client, query).await {
                Ok(article) => article,
                Err(e) if e.is_transport() => {
                    error!(fetcher = fetcher.name(), error = %e, "Source unreachable");
                    None
                }
                Err(e) => {
                    warn!(fetcher = fetcher.name(), error = %e, "Fetcher failed");
                    None
                }
            }
        });
        let slots = join_all(tasks).await;

        let found = slots.iter().filter(|s| s.is_some()).count();
        info!(query = query, found = found, total = slots.len(), "Fetch complete");
        Ok(slots)
    }
}

impl Drop for ArticleRetriever {
    fn drop(&mut self) {
        self.close();
    }
}

/// Scope guard returned by [`ArticleRetriever::session`].
pub struct RetrieverSession<'a> {
    retriever: &'a mut ArticleRetriever,
}

impl Deref for RetrieverSession<'_> {
    type Target = ArticleRetriever;

    fn deref(&self) -> &ArticleRetriever {
        self.retriever
    }
}

impl Drop for RetrieverSession<'_> {
    fn drop(&mut self) {
        self.retriever.close();
    }
}
