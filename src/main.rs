//! scholarfetch - first-result article lookup across academic sources
//!
//! ## Usage
//!
//! ```bash
//! scholarfetch search "graph neural networks" --source gscholar --source openalex
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use scholarfetch::{
    ArticleRetriever, Fetcher, GoogleScholarFetcher, OpenAlexFetcher, RetrieverConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Fetch the top article for a query from academic search sources
#[derive(Parser)]
#[command(name = "scholarfetch")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query every selected source and print the first result of each
    Search {
        /// Search keywords
        query: String,

        /// Sources to query, in output order
        #[arg(long = "source", value_enum, default_values_t = [Source::Gscholar])]
        sources: Vec<Source>,

        /// Google Scholar mirror site URL
        #[arg(long)]
        mirror: Option<String>,

        /// Proxy URL (e.g., http://127.0.0.1:7890)
        #[arg(long)]
        proxy: Option<String>,

        /// Per-request timeout in seconds (0 disables)
        #[arg(long, default_value = "30")]
        timeout: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Source {
    Gscholar,
    Openalex,
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search {
            query,
            sources,
            mirror,
            proxy,
            timeout,
        } => run_search(query, sources, mirror, proxy, timeout).await,
    }
}

async fn run_search(
    query: String,
    sources: Vec<Source>,
    mirror: Option<String>,
    proxy: Option<String>,
    timeout: u64,
) -> Result<()> {
    let fetchers = build_fetchers(&sources, mirror.as_deref())?;

    let config = RetrieverConfig {
        timeout: (timeout > 0).then(|| Duration::from_secs(timeout)),
        proxy,
        ..Default::default()
    };

    let mut retriever = ArticleRetriever::new(fetchers, config);
    let session = retriever.session().context("Failed to open HTTP client")?;
    let slots = session.fetch(&query).await?;

    if slots.iter().all(Option::is_none) {
        info!(query = %query, "No articles found for your query");
    }

    println!("{}", serde_json::to_string_pretty(&slots)?);
    Ok(())
}

fn build_fetchers(sources: &[Source], mirror: Option<&str>) -> Result<Vec<Arc<dyn Fetcher>>> {
    let mut fetchers: Vec<Arc<dyn Fetcher>> = Vec::with_capacity(sources.len());
    for source in sources {
        match source {
            Source::Gscholar => {
                let fetcher = match mirror {
                    Some(url) => GoogleScholarFetcher::with_base_url(url)
                        .context("Invalid --mirror URL")?,
                    None => GoogleScholarFetcher::new()?,
                };
                fetchers.push(Arc::new(fetcher));
            }
            Source::Openalex => fetchers.push(Arc::new(OpenAlexFetcher::new()?)),
        }
    }
    Ok(fetchers)
}
