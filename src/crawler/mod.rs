//! Crawler module for page fetching, link discovery and content extraction
//!
//! This module contains the crawl side of the pipeline, including:
//! - HTTP fetching with a fixed identity header and timeout
//! - HTML parsing, link extraction and text extraction
//! - Bounded breadth-first link discovery
//! - Per-domain crawl coordination and single-source scraping

mod coordinator;
mod discovery;
mod fetcher;
mod parser;
mod scraper;

pub use coordinator::{Coordinator, CrawlSettings, DomainCrawlResult};
pub use discovery::{LinkDiscoverer, DEFAULT_QUEUE_LIMIT};
pub use fetcher::{
    build_http_client, fetch_url, FetchError, FetchResult, FetchedPage, HttpFetcher, PageSource,
};
pub use parser::{extract_links, extract_page, ContentOptions, ExtractedPage, TitleSource};
pub use scraper::{ScrapedPage, SourceScraper};

use crate::config::Config;
use std::time::Duration;

/// Deep crawls every configured domain over HTTP
///
/// This is the main entry point for the crawl stage. It will:
/// 1. Build the HTTP client from the user-agent config
/// 2. Run discovery and extraction for each `[[domain]]` in order
///
/// # Returns
///
/// * `Ok(results)` - One result per domain with a valid seed
/// * `Err(reqwest::Error)` - The HTTP client could not be built
pub async fn crawl(config: &Config) -> Result<Vec<DomainCrawlResult>, reqwest::Error> {
    let fetcher = HttpFetcher::new(
        &config.user_agent,
        Duration::from_secs(config.crawler.fetch_timeout_secs),
    )?;
    let coordinator = Coordinator::new(fetcher, CrawlSettings::from(&config.crawler));
    Ok(coordinator.crawl_all(&config.domains).await)
}

/// Scrapes every configured `[[source]]` page over HTTP
pub async fn scrape(config: &Config) -> Result<Vec<ScrapedPage>, reqwest::Error> {
    let fetcher = HttpFetcher::new(
        &config.user_agent,
        Duration::from_secs(config.crawler.fetch_timeout_secs),
    )?;
    let scraper = SourceScraper::new(fetcher, &config.crawler);
    Ok(scraper.scrape_sources(&config.sources).await)
}
