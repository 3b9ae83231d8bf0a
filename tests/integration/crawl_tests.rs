//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run discovery,
//! crawling, scraping and extraction end-to-end over real HTTP.

use qa_harvest::config::{CrawlerConfig, SourceEntry, UserAgentConfig};
use qa_harvest::config::parse_config;
use qa_harvest::crawler::{
    Coordinator, CrawlSettings, FetchError, FetchResult, HttpFetcher, LinkDiscoverer,
    PageSource, SourceScraper,
};
use qa_harvest::extract::{ExtractionProfile, QaExtractor};
use qa_harvest::pipeline::run_crawl;
use qa_harvest::HarvestError;
use tempfile::TempDir;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(&UserAgentConfig::default(), Duration::from_secs(5))
        .expect("Failed to build HTTP client")
}

fn settings(max_pages: usize) -> CrawlSettings {
    CrawlSettings {
        max_depth: 2,
        queue_limit: 50,
        max_pages,
        request_delay: Duration::ZERO,
        max_lines: 2000,
    }
}

fn host(server: &MockServer) -> String {
    Url::parse(&server.uri())
        .expect("Failed to parse base URL")
        .host_str()
        .expect("Failed to extract host")
        .to_string()
}

async fn mount_page(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn article(title: &str, body: &str) -> String {
    format!(
        "<html><head><title>{}</title><style>p {{ color: red; }}</style></head>\
         <body><p>{}</p><script>track();</script></body></html>",
        title, body
    )
}

#[tokio::test]
async fn test_crawl_domain_prefers_articles() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        format!(
            r#"<html><body>
            <a href="/blog/hull-cover">Hull cover</a>
            <a href="/about">About</a>
            <a href="{}/news/storm-season">Storms</a>
            <a href="https://twitter.com/marineins">Twitter</a>
            <a href="mailto:info@marineins.com">Mail</a>
            </body></html>"#,
            base
        ),
    )
    .await;
    mount_page(
        &server,
        "/blog/hull-cover",
        article("Hull Cover", "Hull insurance covers physical damage to the boat."),
    )
    .await;
    mount_page(
        &server,
        "/news/storm-season",
        article("Storm Season", "Named storm deductibles can be 10% of hull value."),
    )
    .await;

    let domain = host(&server);
    let seed = Url::parse(&format!("{}/", base)).unwrap();
    let coordinator = Coordinator::new(fetcher(), settings(20));
    let result = coordinator.crawl_domain(&seed, &domain, 20).await;

    assert_eq!(result.total_links_found, 3);
    assert_eq!(result.article_links_found, 2);
    assert_eq!(result.pages_scraped, 2);

    let titles: Vec<_> = result.pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Hull Cover", "Storm Season"]);

    let hull = &result.pages[0];
    assert!(hull
        .lines
        .contains(&"Hull insurance covers physical damage to the boat.".to_string()));
    assert!(!hull.content().contains("track()"));
    assert!(!hull.content().contains("color: red"));
}

#[tokio::test]
async fn test_crawl_domain_falls_back_to_all_links() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/hull">h</a><a href="/liability">l</a><a href="/claims">c</a>"#.to_string(),
    )
    .await;
    for route in ["/hull", "/liability", "/claims"] {
        mount_page(&server, route, article(route, "Cover details.")).await;
    }

    let seed = Url::parse(&format!("{}/", server.uri())).unwrap();
    let coordinator = Coordinator::new(fetcher(), settings(2));
    let result = coordinator.crawl_domain(&seed, &host(&server), 2).await;

    assert_eq!(result.total_links_found, 3);
    assert_eq!(result.article_links_found, 3);
    assert_eq!(result.pages_scraped, 2);
}

#[tokio::test]
async fn test_discovery_skips_failed_pages() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<a href="/broken">x</a><a href="/ok">y</a>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, "/ok", r#"<a href="/deeper">z</a>"#.to_string()).await;

    let source = fetcher();
    let seed = Url::parse(&format!("{}/", server.uri())).unwrap();
    let links = LinkDiscoverer::new(&source, 50)
        .discover(&seed, &host(&server), 3)
        .await;

    let paths: Vec<_> = links.iter().map(|l| l.path().to_string()).collect();
    assert_eq!(paths, vec!["/broken", "/ok", "/deeper"]);
}

#[tokio::test]
async fn test_fetch_classifies_status() {
    let server = MockServer::start().await;
    mount_page(&server, "/ok", "<p>fine</p>".to_string()).await;

    let source = fetcher();

    let ok = source.fetch(&format!("{}/ok", server.uri())).await;
    match ok.result {
        FetchResult::Success {
            status_code, body, ..
        } => {
            assert_eq!(status_code, 200);
            assert_eq!(body, "<p>fine</p>");
        }
        other => panic!("expected success, got {:?}", other),
    }

    let missing = source.fetch(&format!("{}/missing", server.uri())).await;
    assert!(matches!(
        missing.result,
        FetchResult::HttpError { status_code: 404 }
    ));
}

#[tokio::test]
async fn test_scrape_sources_over_http() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/terms/yacht-insurance",
        "<html><body>\
         <h1>What is yacht insurance?</h1>\
         <p>Yacht insurance covers theft, fire and storm damage to the hull.</p>\
         </body></html>"
            .to_string(),
    )
    .await;

    let scraper = SourceScraper::new(fetcher(), &CrawlerConfig::default()).with_delay(Duration::ZERO);
    let pages = scraper
        .scrape_sources(&[
            SourceEntry {
                url: format!("{}/terms/yacht-insurance", server.uri()),
            },
            SourceEntry {
                url: format!("{}/gone", server.uri()),
            },
        ])
        .await;

    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].page.title, "What is yacht insurance?");
    assert_eq!(pages[0].domain, host(&server));
    assert!(pages[0].page.fingerprint.is_some());

    let mut extractor = QaExtractor::new(ExtractionProfile::source_pages());
    let pairs = extractor.extract_from_sources(&pages);
    assert!(pairs
        .iter()
        .any(|p| p.question == "What does Yacht insurance cover?"));
}

#[tokio::test]
async fn test_crawl_then_extract() {
    let server = MockServer::start().await;

    mount_page(&server, "/", r#"<a href="/blog/deductibles">d</a>"#.to_string()).await;
    mount_page(
        &server,
        "/blog/deductibles",
        article(
            "Deductibles",
            "The deductible for this policy is $500. Hull insurance covers physical damage to the boat.",
        ),
    )
    .await;

    let domain = host(&server);
    let seed = Url::parse(&format!("{}/", server.uri())).unwrap();
    let result = Coordinator::new(fetcher(), settings(20))
        .crawl_domain(&seed, &domain, 20)
        .await;

    let mut extractor = QaExtractor::new(ExtractionProfile::deep_crawl());
    let pairs = extractor.extract_from_crawl(&[result]);
    let questions: Vec<_> = pairs.iter().map(|p| p.question.as_str()).collect();

    assert!(questions.contains(&"What is the cost?"));
    assert!(questions.contains(&"What about deductible?"));
    assert!(questions.contains(&"What does coverage include?"));
    assert!(pairs.iter().all(|p| p.domain == domain));
}

#[tokio::test]
async fn test_fetch_timeout_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&UserAgentConfig::default(), Duration::from_secs(1))
        .expect("Failed to build HTTP client");
    let page = fetcher.fetch(&format!("{}/slow", server.uri())).await;

    assert!(matches!(
        page.result,
        FetchResult::NetworkError { timed_out: true, .. }
    ));
    assert!(matches!(page.into_markup(), Err(FetchError::Timeout { .. })));
}

#[tokio::test]
async fn test_crawl_stage_timeout() {
    let server = MockServer::start().await;
    let hrefs: String = (0..6)
        .map(|i| format!(r#"<a href="/blog/post-{}">post</a>"#, i))
        .collect();
    mount_page(&server, "/", format!("<html><body>{}</body></html>", hrefs)).await;

    Mock::given(method("GET"))
        .and(wiremock::matchers::path_regex(r"^/blog/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article("Slow", "Slow page."))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let crawl_path = dir.path().join("crawl.json");
    let config = parse_config(&format!(
        r#"
[crawler]
request-delay-ms = 0
fetch-timeout-secs = 1
crawl-timeout-secs = 2

[output]
crawl-path = "{}"

[import]
endpoint = "http://127.0.0.1:1/api/v1/bulk-import"

[[domain]]
id = "{}"
seed = "{}/"
"#,
        crawl_path.display(),
        host(&server),
        server.uri()
    ))
    .expect("Failed to parse config");

    match run_crawl(&config).await {
        Err(HarvestError::StageTimeout { stage, seconds }) => {
            assert_eq!(stage, "crawl");
            assert_eq!(seconds, 2);
        }
        other => panic!("expected crawl stage timeout, got {:?}", other.map(|r| r.len())),
    }
    assert!(!crawl_path.exists());
}
