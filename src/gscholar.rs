//! Google Scholar fetcher.
//!
//! Fetches the Scholar results page for a query over plain HTTP and scrapes
//! the first result entry out of the HTML.

use crate::article::{Article, CandidateArticle};
use crate::error::{FetchError, Result};
use crate::fetcher::{fetch_text, parse_base_url, search_url, Fetcher};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

/// Default Google Scholar URL
pub const DEFAULT_SCHOLAR_URL: &str = "https://scholar.google.com";

/// Compiled selectors for a Scholar results page.
#[derive(Debug, Clone)]
struct ScholarSelectors {
    first_entry: Selector,
    link: Selector,
    download_link: Selector,
    snippet: Selector,
    title_link: Selector,
    meta: Selector,
    action_bar: Selector,
    hidden_action_bar: Selector,
    digits: Regex,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| FetchError::Parse(format!("Bad selector '{}': {}", css, e)))
}

impl ScholarSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            first_entry: selector(r#"[data-rp="0"]"#)?,
            link: selector("a")?,
            download_link: selector(".gs_ggs a")?,
            snippet: selector(".gs_rs")?,
            title_link: selector(".gs_ri h3.gs_rt a")?,
            meta: selector(".gs_a")?,
            action_bar: selector(".gs_fl.gs_flb:not(.gs_invis)")?,
            hidden_action_bar: selector(".gs_fl.gs_flb.gs_invis")?,
            digits: Regex::new(r"\d+").map_err(|e| FetchError::Parse(e.to_string()))?,
        })
    }
}

/// Fetcher for Google Scholar (or a mirror serving the same markup).
#[derive(Debug, Clone)]
pub struct GoogleScholarFetcher {
    base_url: Url,
    selectors: ScholarSelectors,
}

impl GoogleScholarFetcher {
    /// Fetcher against the public Scholar site
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_SCHOLAR_URL)
    }

    /// Fetcher against a custom base URL (mirror site)
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            selectors: ScholarSelectors::new()?,
        })
    }

    /// Extract the first article from a Scholar results page.
    ///
    /// Returns `None` when the page has no first entry or the entry is
    /// missing any required field.
    pub fn parse_first_article(&self, html: &str) -> Option<Article> {
        if html.contains("Solving the above CAPTCHA") || html.contains("gs_captcha_ccl") {
            warn!("CAPTCHA page returned by Google Scholar");
            return None;
        }

        let document = Html::parse_document(html);
        let sel = &self.selectors;

        let Some(entry) = document.select(&sel.first_entry).next() else {
            info!("No result entry on Google Scholar page");
            return None;
        };

        let pdf_url = entry
            .select(&sel.download_link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string);
        let summary = entry.select(&sel.snippet).next().map(element_text);
        let title_link = entry.select(&sel.title_link).next();
        let source_url = title_link
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string);
        let title = title_link.map(element_text);
        let authors = entry
            .select(&sel.meta)
            .next()
            .map(|meta| split_authors(&element_text(meta)));

        let Some(cited) = self.citation_text(entry) else {
            warn!("Citation control missing from first Google Scholar entry");
            return None;
        };

        CandidateArticle {
            source_url,
            pdf_url,
            title,
            authors,
            summary,
            citation_count: parse_citation_count(&sel.digits, &cited),
        }
        .into_article()
    }

    /// Text of the citation link, probing the visible action bar first and
    /// the hidden variant second.
    fn citation_text(&self, entry: ElementRef<'_>) -> Option<String> {
        let sel = &self.selectors;
        [&sel.action_bar, &sel.hidden_action_bar]
            .into_iter()
            .find_map(|bar| {
                entry
                    .select(bar)
                    .next()
                    .and_then(|bar| bar.select(&sel.link).nth(2))
                    .map(element_text)
            })
    }
}

#[async_trait]
impl Fetcher for GoogleScholarFetcher {
    fn name(&self) -> &str {
        "gscholar"
    }

    fn build_query(&self, query: &str) -> Url {
        search_url(&self.base_url, "scholar", &[("q", query)])
    }

    async fn fetch_and_extract(&self, client: &Client, query: &str) -> Result<Option<Article>> {
        let url = self.build_query(query);
        info!(query = query, url = %url, "Starting Google Scholar query");

        let html = fetch_text(client, &url).await?;
        let article = self.parse_first_article(&html);

        debug!(found = article.is_some(), "Google Scholar query complete");
        Ok(article)
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

/// Split the author list off a "authors - venue, year - publisher" line.
///
/// Everything before the first dash is kept, minus the character right
/// before the dash. A line without a dash is returned unchanged.
pub fn split_authors(line: &str) -> String {
    match line.find('-') {
        Some(idx) => {
            let mut head = line[..idx].chars();
            head.next_back();
            head.as_str().to_string()
        }
        None => {
            warn!(line = line, "Bad authors string");
            line.to_string()
        }
    }
}

/// First run of digits in `text` as a count, 0 when absent or unparsable.
pub fn parse_citation_count(digits: &Regex, text: &str) -> u64 {
    let Some(found) = digits.find(text) else {
        return 0;
    };
    match found.as_str().parse::<u64>() {
        Ok(count) => count,
        Err(e) => {
            warn!(text = text, error = %e, "Invalid citation count");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTIONS: &str = r#"<a href="/save">Save</a> <a href="/cite">Cite</a> <a href="/scholar?cites=1">Cited by 150</a> <a href="/related">Related articles</a>"#;

    struct Entry {
        pdf: bool,
        snippet: bool,
        title: bool,
        meta: bool,
        actions: Option<&'static str>,
        hidden_actions: Option<&'static str>,
    }

    impl Default for Entry {
        fn default() -> Self {
            Self {
                pdf: true,
                snippet: true,
                title: true,
                meta: true,
                actions: Some(ACTIONS),
                hidden_actions: None,
            }
        }
    }

    impl Entry {
        fn html(&self) -> String {
            let mut body = String::from(r#"<div class="gs_r gs_or gs_scl" data-rp="0">"#);
            if self.pdf {
                body.push_str(r#"<div class="gs_ggs"><a href="https://arxiv.org/pdf/1812.08434">[PDF] arxiv.org</a></div>"#);
            }
            body.push_str(r#"<div class="gs_ri">"#);
            if self.title {
                body.push_str(r#"<h3 class="gs_rt"><a href="https://www.sciencedirect.com/gnn">Graph neural networks: A review</a></h3>"#);
            }
            if self.meta {
                body.push_str(r#"<div class="gs_a">J Zhou, G Cui, S Hu - AI open, 2020 - Elsevier</div>"#);
            }
            if self.snippet {
                body.push_str(r#"<div class="gs_rs">Lots of learning tasks require dealing with graph data.</div>"#);
            }
            if let Some(actions) = self.actions {
                body.push_str(&format!(r#"<div class="gs_fl gs_flb">{}</div>"#, actions));
            }
            if let Some(actions) = self.hidden_actions {
                body.push_str(&format!(r#"<div class="gs_fl gs_flb gs_invis">{}</div>"#, actions));
            }
            body.push_str("</div></div>");
            format!("<html><body><div id=\"gs_res_ccl_mid\">{}</div></body></html>", body)
        }
    }

    fn fetcher() -> GoogleScholarFetcher {
        GoogleScholarFetcher::new().expect("default fetcher")
    }

    fn digits() -> Regex {
        Regex::new(r"\d+").expect("regex")
    }

    #[test]
    fn test_build_query_is_deterministic() {
        let fetcher = fetcher();
        let first = fetcher.build_query("graph neural networks");
        let second = fetcher.build_query("graph neural networks");
        assert_eq!(first.as_str(), second.as_str());
        assert_eq!(first.as_str(), "https://scholar.google.com/scholar?q=graph+neural+networks");
    }

    #[test]
    fn test_mirror_base_url() -> Result<()> {
        let fetcher = GoogleScholarFetcher::with_base_url("https://scholar.example.org/")?;
        assert_eq!(
            fetcher.build_query("gnn").as_str(),
            "https://scholar.example.org/scholar?q=gnn"
        );
        Ok(())
    }

    #[test]
    fn test_parse_complete_entry() {
        let article = fetcher()
            .parse_first_article(&Entry::default().html())
            .expect("entry should parse");
        assert_eq!(article.source_url, "https://www.sciencedirect.com/gnn");
        assert_eq!(article.pdf_url, "https://arxiv.org/pdf/1812.08434");
        assert_eq!(article.title, "Graph neural networks: A review");
        assert_eq!(article.authors, "J Zhou, G Cui, S Hu");
        assert_eq!(article.summary, "Lots of learning tasks require dealing with graph data.");
        assert_eq!(article.citation_count, 150);
    }

    #[test]
    fn test_parse_empty_html() {
        assert!(fetcher()
            .parse_first_article("<html><body></body></html>")
            .is_none());
    }

    #[test]
    fn test_captcha_page() {
        let html = r#"<html><body><div id="gs_captcha_ccl">Please show you're not a robot</div></body></html>"#;
        assert!(fetcher().parse_first_article(html).is_none());
    }

    #[test]
    fn test_missing_required_fields_reject() {
        let cases = [
            Entry { pdf: false, ..Default::default() },
            Entry { snippet: false, ..Default::default() },
            Entry { title: false, ..Default::default() },
            Entry { meta: false, ..Default::default() },
            Entry { actions: None, ..Default::default() },
        ];
        let fetcher = fetcher();
        for case in cases {
            assert!(fetcher.parse_first_article(&case.html()).is_none());
        }
    }

    #[test]
    fn test_hidden_action_bar_fallback() {
        let entry = Entry {
            actions: None,
            hidden_actions: Some(ACTIONS),
            ..Default::default()
        };
        let article = fetcher()
            .parse_first_article(&entry.html())
            .expect("hidden variant should parse");
        assert_eq!(article.citation_count, 150);
    }

    #[test]
    fn test_short_action_bar_falls_back_to_hidden() {
        let entry = Entry {
            actions: Some(r#"<a href="/save">Save</a>"#),
            hidden_actions: Some(r#"<a>Save</a><a>Cite</a><a>Cited by 42</a>"#),
            ..Default::default()
        };
        let article = fetcher()
            .parse_first_article(&entry.html())
            .expect("hidden variant should parse");
        assert_eq!(article.citation_count, 42);
    }

    #[test]
    fn test_uncited_entry_has_zero_count() {
        let entry = Entry {
            actions: Some(r#"<a>Save</a><a>Cite</a><a>Related articles</a>"#),
            ..Default::default()
        };
        let article = fetcher()
            .parse_first_article(&entry.html())
            .expect("entry should parse");
        assert_eq!(article.citation_count, 0);
    }

    #[test]
    fn test_parse_citation_count() {
        let digits = digits();
        assert_eq!(parse_citation_count(&digits, "Cited by 42"), 42);
        assert_eq!(parse_citation_count(&digits, "Related articles"), 0);
        assert_eq!(parse_citation_count(&digits, "Cited by 99999999999999999999999"), 0);
    }

    #[test]
    fn test_split_authors() {
        assert_eq!(
            split_authors("J. Smith, A. Lee - Journal of Foo, 2020"),
            "J. Smith, A. Lee"
        );
        assert_eq!(split_authors("J. Smith, A. Lee"), "J. Smith, A. Lee");
        assert_eq!(split_authors("J Zhou\u{a0}- AI open"), "J Zhou");
    }
}
