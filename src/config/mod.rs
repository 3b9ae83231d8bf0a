//! Configuration module for qa-harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and resolving the import credential once at startup.
//!
//! # Example
//!
//! ```no_run
//! use qa_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("qa-harvest.toml")).unwrap();
//! println!("Discovery depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod target;
mod types;
mod validation;

pub use types::{
    Config, CrawlerConfig, DomainEntry, ImportConfig, OutputConfig, SourceEntry, UserAgentConfig,
};

pub use parser::{load_config, load_config_with_hash, parse_config};
pub use target::ImportTarget;
