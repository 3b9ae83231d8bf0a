//! URL handling module for qa-harvest
//!
//! This module provides domain extraction, same-site matching, and
//! article-path classification for discovered links.

mod domain;
mod matcher;

pub use domain::{extract_domain, site_label};
pub use matcher::matches_domain;

use url::Url;

/// Path fragments that mark a link as article-like
pub const ARTICLE_MARKERS: &[&str] = &[
    "/blog/",
    "/post/",
    "/article/",
    "/news/",
    "/guide/",
    "/page/",
    "/category/",
];

/// Link classification types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkClass {
    /// Path looks like a blog post, article, guide or listing page
    Article,
    /// Anything else on the site
    Other,
}

impl LinkClass {
    /// Returns true if the link is article-like
    pub fn is_article(&self) -> bool {
        matches!(self, Self::Article)
    }
}

/// Classifies a link by the article markers found in its path
///
/// # Examples
///
/// ```
/// use url::Url;
/// use qa_harvest::url::{classify_link, LinkClass};
///
/// let url = Url::parse("https://marineins.com/blog/hull-cover").unwrap();
/// assert_eq!(classify_link(&url), LinkClass::Article);
///
/// let url = Url::parse("https://marineins.com/contact").unwrap();
/// assert_eq!(classify_link(&url), LinkClass::Other);
/// ```
pub fn classify_link(url: &Url) -> LinkClass {
    let path = url.path();
    if ARTICLE_MARKERS.iter().any(|marker| path.contains(marker)) {
        LinkClass::Article
    } else {
        LinkClass::Other
    }
}

/// Returns true if the URL's host belongs to the site named by `domain_filter`
pub fn belongs_to_site(url: &Url, domain_filter: &str) -> bool {
    let filter = domain_filter.trim().to_lowercase();
    extract_domain(url).is_some_and(|host| matches_domain(&host, &filter))
}
