use crate::config::types::{Config, CrawlerConfig, DomainEntry, ImportConfig, OutputConfig, SourceEntry};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent(&config.user_agent.header)?;
    validate_output_config(&config.output)?;
    validate_import_config(&config.import)?;
    validate_domains(&config.domains)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 {
        return Err(ConfigError::Validation(
            "max_depth must be >= 1, got 0".to_string(),
        ));
    }

    if config.queue_limit < 1 {
        return Err(ConfigError::Validation(
            "queue_limit must be >= 1, got 0".to_string(),
        ));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1, got 0".to_string(),
        ));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "fetch_timeout_secs must be >= 1, got 0".to_string(),
        ));
    }

    if config.crawl_timeout_secs < config.fetch_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "crawl_timeout_secs ({}) must not be shorter than fetch_timeout_secs ({})",
            config.crawl_timeout_secs, config.fetch_timeout_secs
        )));
    }

    if config.max_lines < 1 || config.scrape_max_lines < 1 {
        return Err(ConfigError::Validation(format!(
            "line caps must be >= 1, got max_lines={} scrape_max_lines={}",
            config.max_lines, config.scrape_max_lines
        )));
    }

    Ok(())
}

/// Validates the User-Agent header value
fn validate_user_agent(header: &str) -> Result<(), ConfigError> {
    if header.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent header cannot be empty".to_string(),
        ));
    }

    if header.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(
            "user-agent header cannot contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("crawl_path", &config.crawl_path),
        ("scraped_path", &config.scraped_path),
        ("qa_path", &config.qa_path),
        ("csv_path", &config.csv_path),
        ("stats_path", &config.stats_path),
        ("log_path", &config.log_path),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

/// Validates import configuration
fn validate_import_config(config: &ImportConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid import endpoint: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Import endpoint '{}' must use HTTP or HTTPS",
            config.endpoint
        )));
    }

    if config.api_key_env.is_empty() {
        return Err(ConfigError::Validation(
            "api_key_env cannot be empty".to_string(),
        ));
    }

    if config.api_key_header.is_empty() {
        return Err(ConfigError::Validation(
            "api_key_header cannot be empty".to_string(),
        ));
    }

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(
            "batch_size must be >= 1, got 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates deep-crawl domain entries
fn validate_domains(domains: &[DomainEntry]) -> Result<(), ConfigError> {
    for entry in domains {
        validate_domain_string(&entry.id)?;
        validate_http_url(&entry.seed, "seed")?;

        if entry.max_pages == Some(0) {
            return Err(ConfigError::Validation(format!(
                "Domain '{}' max_pages must be >= 1",
                entry.id
            )));
        }
    }

    Ok(())
}

/// Validates single-source entries
fn validate_sources(sources: &[SourceEntry]) -> Result<(), ConfigError> {
    for entry in sources {
        validate_http_url(&entry.url, "source")?;
    }
    Ok(())
}

fn validate_http_url(value: &str, what: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} URL '{}': {}", what, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "{} URL '{}' must use HTTP or HTTPS",
            what, value
        )));
    }

    Ok(())
}

/// Validates a domain identifier: dot-separated labels of letters, digits
/// and inner hyphens, at least two labels
fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Domain cannot be empty".to_string(),
        ));
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain '{}' must contain at least one dot (e.g., 'boatus.com')",
            domain
        )));
    }

    for label in labels {
        if label.is_empty() {
            return Err(ConfigError::InvalidPattern(format!(
                "Domain '{}' has an empty label",
                domain
            )));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(ConfigError::InvalidPattern(format!(
                "Domain '{}' has a label starting or ending with '-'",
                domain
            )));
        }
        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            return Err(ConfigError::InvalidPattern(format!(
                "Domain '{}' contains invalid characters",
                domain
            )));
        }
    }

    Ok(())
}
