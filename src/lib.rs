//! # scholarfetch
//!
//! Fetch the top matching article for a free-text query from several
//! academic search sources at once.
//!
//! ## Modules
//!
//! - [`retriever`] - Concurrent fan-out over all registered fetchers
//! - [`fetcher`] - The `Fetcher` trait implemented by each source
//! - [`gscholar`] - Google Scholar HTML scraping
//! - [`openalex`] - OpenAlex works API
//! - [`article`] - Article record and acceptance rule
//! - [`config`] - HTTP client settings
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scholarfetch::{ArticleRetriever, Fetcher, GoogleScholarFetcher, RetrieverConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fetchers: Vec<Arc<dyn Fetcher>> = vec![Arc::new(GoogleScholarFetcher::new()?)];
//!     let mut retriever = ArticleRetriever::new(fetchers, RetrieverConfig::default());
//!     let session = retriever.session()?;
//!     let slots = session.fetch("graph neural networks").await?;
//!     println!("Found {} articles", slots.iter().flatten().count());
//!     Ok(())
//! }
//! ```

pub mod article;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod gscholar;
pub mod openalex;
pub mod retriever;

pub use article::Article;
pub use config::RetrieverConfig;
pub use error::{FetchError, Result};
pub use fetcher::Fetcher;
pub use gscholar::GoogleScholarFetcher;
pub use openalex::OpenAlexFetcher;
pub use retriever::{ArticleRetriever, RetrieverSession};
