//! Normalized article record and the acceptance rule that guards it.
//!
//! Fetchers never build an [`Article`] directly. They fill a
//! [`CandidateArticle`] with whatever they managed to locate and hand it to
//! [`CandidateArticle::into_article`], which either yields a complete record
//! or nothing.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A single article retrieved from a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Landing page of the article
    pub source_url: String,
    /// Direct link to a downloadable document
    pub pdf_url: String,
    /// Article title
    pub title: String,
    /// Author list as rendered by the source
    pub authors: String,
    /// Abstract or snippet, possibly empty
    pub summary: String,
    /// Number of citations
    pub citation_count: u64,
}

/// Raw fields extracted from a source page, prior to validation.
#[derive(Debug, Clone, Default)]
pub struct CandidateArticle {
    pub source_url: Option<String>,
    pub pdf_url: Option<String>,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub summary: Option<String>,
    pub citation_count: u64,
}

impl CandidateArticle {
    /// Names of the required fields that are missing or blank.
    ///
    /// `summary` only has to be present; an empty snippet is acceptable.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        for (name, value) in [
            ("source_url", &self.source_url),
            ("pdf_url", &self.pdf_url),
            ("title", &self.title),
            ("authors", &self.authors),
        ] {
            if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                missing.push(name);
            }
        }
        if self.summary.is_none() {
            missing.push("summary");
        }
        missing
    }

    /// Accept the candidate as an [`Article`], or reject it.
    ///
    /// A rejected candidate is logged and dropped; partial data is never
    /// defaulted into a record.
    pub fn into_article(self) -> Option<Article> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            warn!(missing = ?missing, "Rejecting incomplete article");
            return None;
        }

        Some(Article {
            source_url: self.source_url?.trim().to_string(),
            pdf_url: self.pdf_url?.trim().to_string(),
            title: self.title?.trim().to_string(),
            authors: self.authors?.trim().to_string(),
            summary: self.summary?.trim().to_string(),
            citation_count: self.citation_count,
        })
    }
}
