use serde::Deserialize;

/// Main configuration structure for qa-harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub import: ImportConfig,
    /// Domains to deep crawl
    #[serde(default, rename = "domain")]
    pub domains: Vec<DomainEntry>,
    /// Single pages to scrape
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of pages dequeued during link discovery
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Discovery stops enqueuing once this many links are pending
    #[serde(rename = "queue-limit")]
    pub queue_limit: usize,

    /// Maximum number of pages scraped per domain
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Pause after each deep-crawl page fetch (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Pause after each single-source scrape (milliseconds)
    #[serde(rename = "scrape-delay-ms")]
    pub scrape_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// Timeout for the whole crawl stage of a pipeline run (seconds)
    #[serde(rename = "crawl-timeout-secs")]
    pub crawl_timeout_secs: u64,

    /// Line cap for deep-crawled pages
    #[serde(rename = "max-lines")]
    pub max_lines: usize,

    /// Line cap for single-source scrapes
    #[serde(rename = "scrape-max-lines")]
    pub scrape_max_lines: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            queue_limit: crate::crawler::DEFAULT_QUEUE_LIMIT,
            max_pages: 20,
            request_delay_ms: 1000,
            scrape_delay_ms: 2000,
            fetch_timeout_secs: 10,
            crawl_timeout_secs: 600,
            max_lines: 2000,
            scrape_max_lines: 1000,
        }
    }
}

/// Identity sent with every page request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Full User-Agent header value
    pub header: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            header: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36"
                .to_string(),
        }
    }
}

/// Artifact locations
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    #[serde(rename = "crawl-path")]
    pub crawl_path: String,

    #[serde(rename = "scraped-path")]
    pub scraped_path: String,

    #[serde(rename = "qa-path")]
    pub qa_path: String,

    #[serde(rename = "csv-path")]
    pub csv_path: String,

    #[serde(rename = "stats-path")]
    pub stats_path: String,

    #[serde(rename = "log-path")]
    pub log_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            crawl_path: "all_domains_crawl.json".to_string(),
            scraped_path: "scraped_content.json".to_string(),
            qa_path: "all_domains_qa.json".to_string(),
            csv_path: "qa_import.csv".to_string(),
            stats_path: "orchestration_stats.json".to_string(),
            log_path: "orchestration.log".to_string(),
        }
    }
}

/// Remote knowledge-base import settings
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Bulk import endpoint
    pub endpoint: String,

    /// Environment variable holding the service credential
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    /// Header the credential is sent in
    #[serde(rename = "api-key-header", default = "default_api_key_header")]
    pub api_key_header: String,

    /// Optional dotenv file loaded before reading `api_key_env`
    #[serde(rename = "env-file", default)]
    pub env_file: Option<String>,

    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(rename = "timeout-secs", default = "default_import_timeout")]
    pub timeout_secs: u64,

    /// Ask the API to validate without committing
    #[serde(rename = "dry-run", default)]
    pub dry_run: bool,
}

fn default_api_key_env() -> String {
    "SUPABASE_SERVICE_ROLE_KEY".to_string()
}

fn default_api_key_header() -> String {
    "x-api-key".to_string()
}

fn default_batch_size() -> usize {
    100
}

fn default_import_timeout() -> u64 {
    60
}

/// A domain to deep crawl
#[derive(Debug, Clone, Deserialize)]
pub struct DomainEntry {
    /// Domain identifier, also used as the same-site filter (e.g. "boatus.com")
    pub id: String,

    /// Seed URL the crawl starts from
    pub seed: String,

    /// Overrides `crawler.max-pages` for this domain
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<usize>,
}

/// A single page to scrape
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    pub url: String,
}
