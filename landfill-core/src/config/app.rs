use std::path::Path;
use std::time::Duration;

use super::error::ConfigError;
use super::provider::{ModelProviderConfig, SearchProviderConfig};
use crate::application::advisor::AdvisoryStrategy;
use crate::application::policy::{CallPolicy, RetryPolicy};
use crate::constants::{
    DEFAULT_LOCATION_ENDPOINT, DEFAULT_LOCATION_TIMEOUT_SECS, DEFAULT_MAX_ROUNDS,
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BACKOFF_MS, DEV_FALLBACK_LOCATION,
};

/// Application configuration loaded from landfill.toml
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model: ModelProviderConfig,
    pub search: SearchProviderConfig,
    pub advisor: AdvisorConfig,
    pub retry: RetryConfig,
    pub location: LocationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvisorConfig {
    pub strategy: AdvisoryStrategy,
    /// Upper bound on model -> search round trips
    pub max_rounds: usize,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            strategy: AdvisoryStrategy::Agentic,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts per external call; 1 disables retries
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_ATTEMPTS,
            backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff: Duration::from_millis(self.backoff_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationConfig {
    pub lookup_endpoint: String,
    /// Returned for private or loopback client addresses
    pub fallback: String,
    pub timeout_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            lookup_endpoint: DEFAULT_LOCATION_ENDPOINT.to_string(),
            fallback: DEV_FALLBACK_LOCATION.to_string(),
            timeout_secs: DEFAULT_LOCATION_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// Parse configuration from TOML text without touching the filesystem
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        super::loader::parse_config(content, Path::new("<inline>"))
    }

    pub fn model_policy(&self) -> CallPolicy {
        CallPolicy::new(self.model.timeout(), self.retry.policy())
    }

    pub fn search_policy(&self) -> CallPolicy {
        CallPolicy::new(self.search.timeout(), self.retry.policy())
    }
}
