//! qa-harvest: a marine-insurance knowledge-base harvester
//!
//! This crate crawls marine-insurance websites, extracts question/answer pairs
//! from the scraped text with pattern rules, and imports the results into a
//! remote knowledge-base API in batches.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod import;
pub mod output;
pub mod pipeline;
pub mod url;

use thiserror::Error;

/// Main error type for qa-harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Artifact error: {0}")]
    Artifact(#[from] output::ArtifactError),

    #[error("Import error: {0}")]
    Import(#[from] import::ImportError),

    #[error("{stage} stage timed out after {seconds}s")]
    StageTimeout { stage: &'static str, seconds: u64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),

    #[error("{0} not found in environment variables")]
    MissingCredential(String),
}

/// Result type alias for qa-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{DomainCrawlResult, ExtractedPage};
pub use extract::QaPair;
pub use url::{classify_link, extract_domain, matches_domain, LinkClass};
