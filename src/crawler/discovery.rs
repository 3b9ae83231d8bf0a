//! Bounded breadth-first link discovery
//!
//! Walks a site from a seed URL, collecting every same-site link it sees.
//! The walk is bounded twice: by the number of pages dequeued (`max_depth`)
//! and by a ceiling on pending queue entries. Links found past the queue
//! ceiling are still recorded, just not followed.

use crate::crawler::fetcher::PageSource;
use crate::crawler::parser::extract_links;
use crate::url::belongs_to_site;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Default ceiling on pending queue entries
pub const DEFAULT_QUEUE_LIMIT: usize = 50;

/// Breadth-first link discoverer
///
/// Holds no state between calls; every [`discover`](Self::discover) starts
/// with a fresh queue and visited set.
pub struct LinkDiscoverer<'a, S> {
    source: &'a S,
    queue_limit: usize,
}

impl<'a, S: PageSource> LinkDiscoverer<'a, S> {
    pub fn new(source: &'a S, queue_limit: usize) -> Self {
        Self {
            source,
            queue_limit,
        }
    }

    /// Discovers same-site links reachable from `seed`
    ///
    /// # Algorithm
    ///
    /// 1. Queue starts as `[seed]`
    /// 2. While the queue is non-empty and fewer than `max_depth` pages have
    ///    been dequeued: pop the front, skip it if visited, mark it visited
    ///    and fetch it
    /// 3. A failed fetch is logged and contributes no links
    /// 4. Every link on the page that belongs to `domain_filter`'s site and
    ///    has not been visited is recorded; it is enqueued only while the
    ///    queue holds fewer than `queue_limit` entries
    ///
    /// # Returns
    ///
    /// The discovered links, deduplicated, in first-discovery order. The seed
    /// is always the first page visited, so its own address is never
    /// returned.
    pub async fn discover(&self, seed: &Url, domain_filter: &str, max_depth: u32) -> Vec<Url> {
        let mut queue: VecDeque<Url> = VecDeque::from([seed.clone()]);
        let mut visited: HashSet<String> = HashSet::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut discovered: Vec<Url> = Vec::new();
        let mut depth = 0u32;

        while depth < max_depth {
            let Some(current) = queue.pop_front() else {
                break;
            };

            if !visited.insert(current.as_str().to_string()) {
                continue;
            }
            depth += 1;

            tracing::debug!("Discovering links from {} (round {})", current, depth);

            let markup = match self.source.fetch(current.as_str()).await.into_markup() {
                Ok(markup) => markup,
                Err(e) => {
                    tracing::warn!("Error discovering links from {}: {}", current, e);
                    continue;
                }
            };

            for link in extract_links(&markup, &current) {
                if !belongs_to_site(&link, domain_filter) || visited.contains(link.as_str()) {
                    continue;
                }

                if seen.insert(link.as_str().to_string()) {
                    discovered.push(link.clone());
                }

                if queue.len() < self.queue_limit {
                    queue.push_back(link);
                }
            }
        }

        tracing::debug!(
            "Discovery from {} finished: {} links, {} pages visited, {} still queued",
            seed,
            discovered.len(),
            visited.len(),
            queue.len()
        );

        discovered
    }
}
