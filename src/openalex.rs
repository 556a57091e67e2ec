//! OpenAlex fetcher
//!
//! Queries the OpenAlex works API as a second article source. OpenAlex
//! returns JSON, and the abstract arrives as an inverted index that has to
//! be rebuilt into plain text.

use crate::article::{Article, CandidateArticle};
use crate::error::Result;
use crate::fetcher::{fetch_text, parse_base_url, search_url, Fetcher};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use url::Url;

/// OpenAlex API base URL
pub const OPENALEX_API_BASE: &str = "https://api.openalex.org";

#[derive(Debug, Deserialize)]
struct OpenAlexResponse {
    #[serde(default)]
    results: Vec<OpenAlexWork>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexWork {
    title: Option<String>,
    display_name: Option<String>,
    doi: Option<String>,
    cited_by_count: Option<u64>,
    abstract_inverted_index: Option<HashMap<String, Vec<usize>>>,
    #[serde(default)]
    authorships: Vec<OpenAlexAuthorship>,
    primary_location: Option<OpenAlexLocation>,
    best_oa_location: Option<OpenAlexLocation>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexAuthorship {
    author: Option<OpenAlexAuthor>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexAuthor {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAlexLocation {
    landing_page_url: Option<String>,
    pdf_url: Option<String>,
}

/// Fetcher for the OpenAlex works search endpoint.
#[derive(Debug, Clone)]
pub struct OpenAlexFetcher {
    base_url: Url,
}

impl OpenAlexFetcher {
    pub fn new() -> Result<Self> {
        Self::with_base_url(OPENALEX_API_BASE)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Map the first work of an OpenAlex search response to an article.
    pub fn parse_first_article(&self, body: &str) -> Option<Article> {
        let response: OpenAlexResponse = match serde_json::from_str(body) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Failed to parse OpenAlex response");
                return None;
            }
        };

        let Some(work) = response.results.into_iter().next() else {
            info!("No results from OpenAlex");
            return None;
        };

        let primary = work.primary_location.as_ref();
        let best_oa = work.best_oa_location.as_ref();

        let source_url = primary
            .and_then(|l| l.landing_page_url.clone())
            .or_else(|| best_oa.and_then(|l| l.landing_page_url.clone()))
            .or_else(|| work.doi.clone());
        let pdf_url = primary
            .and_then(|l| l.pdf_url.clone())
            .or_else(|| best_oa.and_then(|l| l.pdf_url.clone()));

        let names: Vec<String> = work
            .authorships
            .iter()
            .filter_map(|a| a.author.as_ref())
            .filter_map(|a| a.display_name.clone())
            .collect();
        let authors = (!names.is_empty()).then(|| names.join(", "));

        let summary = work
            .abstract_inverted_index
            .as_ref()
            .map(reconstruct_abstract)
            .unwrap_or_default();

        CandidateArticle {
            source_url,
            pdf_url,
            title: work.display_name.or(work.title),
            authors,
            summary: Some(summary),
            citation_count: work.cited_by_count.unwrap_or(0),
        }
        .into_article()
    }
}

#[async_trait]
impl Fetcher for OpenAlexFetcher {
    fn name(&self) -> &str {
        "openalex"
    }

    fn build_query(&self, query: &str) -> Url {
        search_url(&self.base_url, "works", &[("search", query), ("per-page", "1")])
    }

    async fn fetch_and_extract(&self, client: &Client, query: &str) -> Result<Option<Article>> {
        let url = self.build_query(query);
        info!(query = query, url = %url, "Starting OpenAlex query");

        let body = fetch_text(client, &url).await?;
        let article = self.parse_first_article(&body);

        debug!(found = article.is_some(), "OpenAlex query complete");
        Ok(article)
    }
}

/// Rebuild plaintext from OpenAlex's word -> positions abstract index.
fn reconstruct_abstract(inverted_index: &HashMap<String, Vec<usize>>) -> String {
    let mut words: Vec<(usize, &str)> = inverted_index
        .iter()
        .flat_map(|(word, positions)| positions.iter().map(move |p| (*p, word.as_str())))
        .collect();

    words.sort_by_key(|(pos, _)| *pos);
    words.iter().map(|(_, w)| *w).collect::<Vec<_>>().join(" ")
}
