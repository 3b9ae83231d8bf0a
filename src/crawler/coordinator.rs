//! Crawler coordinator - per-domain crawl orchestration
//!
//! This module drives link discovery and content extraction across one
//! domain at a time:
//! - Discovering candidate links from the domain's seed
//! - Preferring article-like links, falling back to everything discovered
//! - Fetching and extracting up to a page cap with a courtesy delay
//! - Assembling a per-domain result record
//!
//! Every failure below this level degrades to "fewer pages"; nothing here
//! returns an error to the caller.

use crate::config::{CrawlerConfig, DomainEntry};
use crate::crawler::discovery::LinkDiscoverer;
use crate::crawler::fetcher::{FetchError, PageSource};
use crate::crawler::parser::{extract_page, ContentOptions, ExtractedPage};
use crate::url::classify_link;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Outcome of crawling one domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainCrawlResult {
    pub domain: String,
    pub start_url: String,
    pub total_links_found: usize,
    /// Links that passed the article filter (or all links, on fallback)
    pub article_links_found: usize,
    pub pages_scraped: usize,
    pub pages: Vec<ExtractedPage>,
    pub scraped_at: DateTime<Utc>,
}

impl DomainCrawlResult {
    /// Total words across all scraped pages
    pub fn word_count(&self) -> usize {
        self.pages.iter().map(ExtractedPage::word_count).sum()
    }
}

/// Tunables for a crawl, derived from [`CrawlerConfig`]
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub max_depth: u32,
    pub queue_limit: usize,
    pub max_pages: usize,
    pub request_delay: Duration,
    pub max_lines: usize,
}

impl From<&CrawlerConfig> for CrawlSettings {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            queue_limit: config.queue_limit,
            max_pages: config.max_pages,
            request_delay: Duration::from_millis(config.request_delay_ms),
            max_lines: config.max_lines,
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator<S> {
    source: S,
    settings: CrawlSettings,
}

impl<S: PageSource> Coordinator<S> {
    /// Creates a new coordinator over a page source
    pub fn new(source: S, settings: CrawlSettings) -> Self {
        Self { source, settings }
    }

    /// Deep crawls a single domain
    ///
    /// # Steps
    ///
    /// 1. Discover links from `seed` (depth from settings)
    /// 2. Keep article-like links; if there are none, keep all links
    /// 3. Take the first `max_pages` in discovery order
    /// 4. Fetch and extract each one sequentially, pausing after every fetch
    /// 5. Assemble the result record
    pub async fn crawl_domain(&self, seed: &Url, domain: &str, max_pages: usize) -> DomainCrawlResult {
        tracing::info!("Deep crawling {} from {}", domain, seed);

        let links = LinkDiscoverer::new(&self.source, self.settings.queue_limit)
            .discover(seed, domain, self.settings.max_depth)
            .await;

        let mut candidates: Vec<&Url> = links
            .iter()
            .filter(|link| classify_link(link).is_article())
            .collect();

        if candidates.is_empty() {
            tracing::debug!("No article-like links on {}, using all discovered links", domain);
            candidates = links.iter().collect();
        }

        tracing::info!(
            "{}: {} links discovered, {} candidate articles",
            domain,
            links.len(),
            candidates.len()
        );

        let options = ContentOptions::deep_crawl(self.settings.max_lines);
        let selected = candidates.len().min(max_pages);
        let mut pages = Vec::with_capacity(selected);

        for (i, link) in candidates.iter().take(max_pages).enumerate() {
            tracing::debug!("Scraping {}/{}: {}", i + 1, selected, link);

            match fetch_and_extract(&self.source, link.as_str(), &options).await {
                Ok(page) => pages.push(page),
                Err(e) => tracing::warn!("Error scraping {}: {}", link, e),
            }

            pause(self.settings.request_delay).await;
        }

        tracing::info!("{}: scraped {} pages successfully", domain, pages.len());

        DomainCrawlResult {
            domain: domain.to_string(),
            start_url: seed.to_string(),
            total_links_found: links.len(),
            article_links_found: candidates.len(),
            pages_scraped: pages.len(),
            pages,
            scraped_at: Utc::now(),
        }
    }

    /// Deep crawls every configured domain in order
    ///
    /// A domain whose seed cannot be parsed is logged and skipped.
    pub async fn crawl_all(&self, domains: &[DomainEntry]) -> Vec<DomainCrawlResult> {
        let mut results = Vec::with_capacity(domains.len());

        for (i, entry) in domains.iter().enumerate() {
            tracing::info!("[{}/{}] Crawling {}", i + 1, domains.len(), entry.id);

            let seed = match Url::parse(&entry.seed) {
                Ok(seed) => seed,
                Err(e) => {
                    tracing::warn!("Skipping {}: invalid seed {}: {}", entry.id, entry.seed, e);
                    continue;
                }
            };

            let max_pages = entry.max_pages.unwrap_or(self.settings.max_pages);
            let result = self.crawl_domain(&seed, &entry.id, max_pages).await;

            tracing::info!(
                "{}: {} pages, {} words",
                entry.id,
                result.pages_scraped,
                result.word_count()
            );
            results.push(result);
        }

        results
    }
}

/// Fetches one page and reduces it to its content
pub(crate) async fn fetch_and_extract<S: PageSource>(
    source: &S,
    url: &str,
    options: &ContentOptions,
) -> Result<ExtractedPage, FetchError> {
    let fetched = source.fetch(url).await;
    let fetched_at = fetched.fetched_at;
    let markup = fetched.into_markup()?;
    Ok(extract_page(url, &markup, options, fetched_at))
}

pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
