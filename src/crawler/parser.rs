//! HTML parser for extracting links and readable content
//!
//! This module handles parsing HTML content to extract:
//! - Links to follow (from `<a href>` tags)
//! - Readable text lines, with script and style content removed
//! - The page title

use chrono::{DateTime, Utc};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use url::Url;

/// Elements whose text never reaches the extracted content
const SKIPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Where a page's title is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    /// The document's `<title>` element
    Document,
    /// The first `<h1>` element
    FirstHeading,
}

/// Per-call-site extraction settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentOptions {
    /// Maximum number of content lines kept
    pub max_lines: usize,
    pub title_source: TitleSource,
    /// Title used when the source element is missing or empty
    pub title_fallback: &'static str,
    /// Whether to compute a content fingerprint
    pub fingerprint: bool,
}

impl ContentOptions {
    /// Settings used for deep-crawled pages
    pub fn deep_crawl(max_lines: usize) -> Self {
        Self {
            max_lines,
            title_source: TitleSource::Document,
            title_fallback: "No title",
            fingerprint: false,
        }
    }

    /// Settings used for single-source scrapes
    pub fn single_page(max_lines: usize) -> Self {
        Self {
            max_lines,
            title_source: TitleSource::FirstHeading,
            title_fallback: "Unknown",
            fingerprint: true,
        }
    }
}

/// A page reduced to its readable text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub url: String,
    pub title: String,
    /// Non-empty, trimmed text lines in document order
    pub lines: Vec<String>,
    pub scraped_at: DateTime<Utc>,
    /// SHA-256 of the joined content, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl ExtractedPage {
    /// The content lines joined with newlines
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Number of whitespace-separated words in the content
    pub fn word_count(&self) -> usize {
        self.lines
            .iter()
            .map(|line| line.split_whitespace().count())
            .sum()
    }
}

/// Reduces a page's markup to an [`ExtractedPage`]
///
/// Text nodes inside `script` and `style` are dropped; every remaining text
/// node is split into lines, trimmed, and kept if non-empty. The result is
/// truncated to `options.max_lines`.
///
/// # Example
///
/// ```
/// use qa_harvest::crawler::{extract_page, ContentOptions};
///
/// let html = "<html><head><title>Hull Cover</title><script>var x;</script></head>\
///             <body><p>Hull insurance covers the boat.</p></body></html>";
/// let page = extract_page("https://example.com/", html, &ContentOptions::deep_crawl(2000), chrono::Utc::now());
/// assert_eq!(page.title, "Hull Cover");
/// assert!(page.lines.contains(&"Hull insurance covers the boat.".to_string()));
/// assert!(!page.content().contains("var x"));
/// ```
pub fn extract_page(
    url: &str,
    html: &str,
    options: &ContentOptions,
    scraped_at: DateTime<Utc>,
) -> ExtractedPage {
    let document = Html::parse_document(html);

    let title = extract_title(&document, options.title_source)
        .unwrap_or_else(|| options.title_fallback.to_string());

    let lines: Vec<String> = text_lines(&document).take(options.max_lines).collect();

    let fingerprint = options.fingerprint.then(|| content_fingerprint(&lines));

    ExtractedPage {
        url: url.to_string(),
        title,
        lines,
        scraped_at,
        fingerprint,
    }
}

/// Yields visible text lines of the document in order
fn text_lines(document: &Html) -> impl Iterator<Item = String> + '_ {
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|element| SKIPPED_ELEMENTS.contains(&element.name()))
            });
            (!hidden).then_some(&**text)
        })
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
}

/// Extracts the page title from the configured element
fn extract_title(document: &Html, source: TitleSource) -> Option<String> {
    let selector = match source {
        TitleSource::Document => Selector::parse("title").ok()?,
        TitleSource::FirstHeading => Selector::parse("h1").ok()?,
    };

    document
        .select(&selector)
        .next()
        .map(|element| {
            element
                .text()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|s| !s.is_empty())
}

fn content_fingerprint(lines: &[String]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(lines.join("\n").as_bytes());
    hex::encode(hasher.finalize())
}

/// Extracts all followable links from the HTML document
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` anywhere in the document, resolved against
/// `base_url`, with any fragment removed.
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links (same page anchors)
/// - Non-HTTP(S) URLs after resolution
///
/// # Example
///
/// ```
/// use qa_harvest::crawler::extract_links;
/// use url::Url;
///
/// let base = Url::parse("https://marineins.com/blog/").unwrap();
/// let links = extract_links(r#"<a href="post-1">One</a>"#, &base);
/// assert_eq!(links[0].as_str(), "https://marineins.com/blog/post-1");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }
    absolute_url.set_fragment(None);

    Some(absolute_url)
}
