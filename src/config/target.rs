use crate::config::types::ImportConfig;
use crate::ConfigError;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Resolved remote import target
///
/// Built once at startup from [`ImportConfig`] and the process environment,
/// then handed to the importer by reference. Nothing below this point reads
/// the environment.
#[derive(Clone)]
pub struct ImportTarget {
    pub endpoint: String,
    pub api_key_header: String,
    api_key: String,
    pub batch_size: usize,
    pub timeout: Duration,
    pub dry_run: bool,
}

impl ImportTarget {
    /// Resolves the target, loading `env_file` first when configured
    ///
    /// A missing env file is not an error; a missing credential is.
    pub fn resolve(config: &ImportConfig) -> Result<Self, ConfigError> {
        if let Some(env_file) = &config.env_file {
            match dotenvy::from_path(Path::new(env_file)) {
                Ok(()) => tracing::debug!("Loaded environment from {}", env_file),
                Err(e) => tracing::debug!("Skipping env file {}: {}", env_file, e),
            }
        }

        Self::resolve_with(config, |name| std::env::var(name).ok())
    }

    /// Resolves the target using `lookup` to read the credential variable
    pub fn resolve_with<F>(config: &ImportConfig, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(&config.api_key_env)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::MissingCredential(config.api_key_env.clone()))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key_header: config.api_key_header.clone(),
            api_key,
            batch_size: config.batch_size,
            timeout: Duration::from_secs(config.timeout_secs),
            dry_run: config.dry_run,
        })
    }

    /// The service credential
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for ImportTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportTarget")
            .field("endpoint", &self.endpoint)
            .field("api_key_header", &self.api_key_header)
            .field("api_key", &"<redacted>")
            .field("batch_size", &self.batch_size)
            .field("timeout", &self.timeout)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}
