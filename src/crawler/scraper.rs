//! Single-page source scraping
//!
//! Scrapes a fixed list of source pages without following links. Each page
//! gets a first-heading title, a content fingerprint and a word count.

use crate::config::{CrawlerConfig, SourceEntry};
use crate::crawler::coordinator::{fetch_and_extract, pause};
use crate::crawler::fetcher::PageSource;
use crate::crawler::parser::{ContentOptions, ExtractedPage};
use crate::url::extract_domain;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// A scraped source page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPage {
    /// Host of the page URL
    pub domain: String,
    pub word_count: usize,
    #[serde(flatten)]
    pub page: ExtractedPage,
}

/// Scrapes configured source pages one after another
pub struct SourceScraper<S> {
    source: S,
    delay: Duration,
    max_lines: usize,
}

impl<S: PageSource> SourceScraper<S> {
    pub fn new(source: S, config: &CrawlerConfig) -> Self {
        Self {
            source,
            delay: Duration::from_millis(config.scrape_delay_ms),
            max_lines: config.scrape_max_lines,
        }
    }

    /// Overrides the pause between sources
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Scrapes every source, skipping the ones that fail
    pub async fn scrape_sources(&self, sources: &[SourceEntry]) -> Vec<ScrapedPage> {
        tracing::info!("Starting scrape of {} sources", sources.len());

        let options = ContentOptions::single_page(self.max_lines);
        let mut pages = Vec::with_capacity(sources.len());

        for (i, entry) in sources.iter().enumerate() {
            tracing::info!("Scraping: {}", entry.url);

            let domain = match Url::parse(&entry.url).ok().as_ref().and_then(extract_domain) {
                Some(domain) => domain,
                None => {
                    tracing::warn!("Skipping {}: no host in URL", entry.url);
                    continue;
                }
            };

            match fetch_and_extract(&self.source, &entry.url, &options).await {
                Ok(page) => {
                    tracing::info!("Saved ({}/{})", i + 1, sources.len());
                    pages.push(ScrapedPage {
                        domain,
                        word_count: page.word_count(),
                        page,
                    });
                }
                Err(e) => tracing::warn!("Error scraping {}: {}", entry.url, e),
            }

            pause(self.delay).await;
        }

        tracing::info!("Scraping complete: {} sources", pages.len());
        pages
    }
}
