use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads, parses and validates a configuration file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use qa_harvest::config::load_config;
///
/// let config = load_config(Path::new("qa-harvest.toml")).unwrap();
/// println!("Domains to crawl: {}", config.domains.len());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;

    tracing::debug!(
        "Parsed config with {} domains and {} sources",
        config.domains.len(),
        config.sources.len()
    );

    Ok(config)
}

/// Loads a configuration together with the hex SHA-256 of the exact text
/// parsed
///
/// The hash is logged at startup so pipeline runs can be matched to the
/// configuration that produced them.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, content_hash(&content)))
}

fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-depth = 3
max-pages = 15
request-delay-ms = 500

[user-agent]
header = "TestCrawler/1.0"

[output]
crawl-path = "./crawl.json"

[import]
endpoint = "https://kb.example.com/api/v1/bulk-import"
batch-size = 50

[[domain]]
id = "marineins.com"
seed = "https://marineins.com/blog/"

[[domain]]
id = "boatus.com"
seed = "https://www.boatus.com/expert-advice/"
max-pages = 5

[[source]]
url = "https://www.investopedia.com/terms/y/yacht-insurance.asp"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.max_pages, 15);
        assert_eq!(config.crawler.queue_limit, crate::crawler::DEFAULT_QUEUE_LIMIT);
        assert_eq!(config.user_agent.header, "TestCrawler/1.0");
        assert_eq!(config.output.crawl_path, "./crawl.json");
        assert_eq!(config.output.qa_path, "all_domains_qa.json");
        assert_eq!(config.import.batch_size, 50);
        assert_eq!(config.import.api_key_env, "SUPABASE_SERVICE_ROLE_KEY");
        assert_eq!(config.import.api_key_header, "x-api-key");
        assert!(!config.import.dry_run);
        assert_eq!(config.domains.len(), 2);
        assert_eq!(config.domains[1].max_pages, Some(5));
        assert_eq!(config.sources.len(), 1);
    }

    #[test]
    fn test_load_minimal_config_uses_defaults() {
        let config_content = r#"
[import]
endpoint = "https://kb.example.com/api/v1/bulk-import"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, 2);
        assert_eq!(config.crawler.max_lines, 2000);
        assert_eq!(config.crawler.scrape_max_lines, 1000);
        assert_eq!(config.crawler.fetch_timeout_secs, 10);
        assert_eq!(config.import.batch_size, 100);
        assert_eq!(config.import.timeout_secs, 60);
        assert!(config.domains.is_empty());
    }

    #[test]
    fn test_bundled_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("qa-harvest.toml");
        let config = load_config(&path).unwrap();

        assert_eq!(config.domains.len(), 16);
        assert_eq!(config.domains[3].id, "marineins.com");
        assert_eq!(config.sources.len(), 8);
        assert_eq!(config.import.env_file.as_deref(), Some("client/.env.local"));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/qa-harvest.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_missing_import_section() {
        let file = create_temp_config("[crawler]\nmax-depth = 2\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[crawler]
max-pages = 0

[import]
endpoint = "https://kb.example.com/api/v1/bulk-import"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_config_with_bad_seed() {
        let config_content = r#"
[import]
endpoint = "https://kb.example.com/api/v1/bulk-import"

[[domain]]
id = "marineins.com"
seed = "marineins.com/blog"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_hash_matches_loaded_file() {
        let content = "[import]\nendpoint = \"https://kb.example.com/api/v1/bulk-import\"\n";
        let file = create_temp_config(content);
        let (config, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(config.import.batch_size, 100);
        assert_eq!(hash, content_hash(content));
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_parse_config_from_str() {
        let config = parse_config(
            "[import]\nendpoint = \"https://kb.example.com/api/v1/bulk-import\"\ndry-run = true\n",
        )
        .unwrap();
        assert!(config.import.dry_run);
    }

    #[test]
    fn test_config_hash_is_sha256_of_content() {
        assert_eq!(
            content_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_ne!(content_hash("max-depth = 2"), content_hash("max-depth = 3"));
    }
}
