use super::app::{AdvisorConfig, AppConfig, LocationConfig, RetryConfig};
use super::error::ConfigError;
use super::provider::{
    RawModelConfig, RawSearchConfig, SearchProviderConfig, is_gemini_type, is_openai_type,
};
use crate::application::advisor::AdvisoryStrategy;
use crate::constants::{CONFIG_PATH, DEFAULT_GEMINI_ENDPOINT, ENV_PATH};
use dotenvy::from_filename;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing::debug;

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    model: Option<RawModelConfig>,
    search: Option<RawSearchConfig>,
    advisor: Option<RawAdvisorConfig>,
    retry: Option<RawRetryConfig>,
    location: Option<RawLocationConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct RawAdvisorConfig {
    strategy: Option<String>,
    max_rounds: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct RawRetryConfig {
    max_attempts: Option<u32>,
    backoff_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct RawLocationConfig {
    lookup_endpoint: Option<String>,
    fallback: Option<String>,
    timeout_secs: Option<u64>,
}

/// Ensures environment variables are loaded from config/.env
fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        if from_filename(ENV_PATH).is_ok() {
            debug!(path = ENV_PATH, "Loaded environment file");
        }
    });
}

/// Load and validate configuration from a file path
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    let config_path = match path {
        Some(path) => expand_path(path),
        None => PathBuf::from(CONFIG_PATH),
    };
    read_config(&config_path)
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&raw).into_owned())
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading engine configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(&content, path)
}

pub(super) fn parse_config(content: &str, path: &Path) -> Result<AppConfig, ConfigError> {
    let parsed: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<AppConfig, ConfigError> {
    let raw_model = parsed.model.ok_or(ConfigError::MissingModel)?;
    let model_name = raw_model
        .model
        .clone()
        .filter(|name| !name.trim().is_empty())
        .ok_or(ConfigError::MissingModel)?;

    let provider_type = raw_model.provider_type();
    let endpoint = if is_gemini_type(&provider_type) {
        raw_model
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string())
    } else if is_openai_type(&provider_type) {
        raw_model
            .endpoint
            .clone()
            .ok_or_else(|| ConfigError::MissingEndpoint {
                provider: raw_model.id.clone().unwrap_or(provider_type.clone()),
            })?
    } else {
        return Err(ConfigError::UnsupportedProvider {
            kind: "model",
            value: provider_type,
        });
    };
    let model = raw_model.into_config(endpoint, model_name);
    require_positive("model.timeout_secs", model.timeout_secs)?;

    let search = SearchProviderConfig::from(parsed.search.unwrap_or_default());
    if !search.provider_type.eq_ignore_ascii_case("tavily") {
        return Err(ConfigError::UnsupportedProvider {
            kind: "search",
            value: search.provider_type,
        });
    }
    require_positive("search.max_results", search.max_results as u64)?;
    require_positive("search.timeout_secs", search.timeout_secs)?;

    let raw_advisor = parsed.advisor.unwrap_or_default();
    let mut advisor = AdvisorConfig::default();
    if let Some(strategy) = raw_advisor.strategy {
        advisor.strategy = strategy
            .parse::<AdvisoryStrategy>()
            .map_err(|reason| ConfigError::InvalidValue {
                field: "advisor.strategy",
                reason,
            })?;
    }
    if let Some(max_rounds) = raw_advisor.max_rounds {
        require_positive("advisor.max_rounds", max_rounds as u64)?;
        advisor.max_rounds = max_rounds;
    }

    let raw_retry = parsed.retry.unwrap_or_default();
    let defaults = RetryConfig::default();
    let retry = RetryConfig {
        max_attempts: raw_retry.max_attempts.unwrap_or(defaults.max_attempts),
        backoff_ms: raw_retry.backoff_ms.unwrap_or(defaults.backoff_ms),
    };
    require_positive("retry.max_attempts", u64::from(retry.max_attempts))?;

    let raw_location = parsed.location.unwrap_or_default();
    let defaults = LocationConfig::default();
    let location = LocationConfig {
        lookup_endpoint: raw_location
            .lookup_endpoint
            .unwrap_or(defaults.lookup_endpoint),
        fallback: raw_location.fallback.unwrap_or(defaults.fallback),
        timeout_secs: raw_location.timeout_secs.unwrap_or(defaults.timeout_secs),
    };

    debug!(
        provider = model.id.as_str(),
        model = model.model.as_str(),
        strategy = ?advisor.strategy,
        max_rounds = advisor.max_rounds,
        "Configuration validated"
    );

    Ok(AppConfig {
        model,
        search,
        advisor,
        retry,
        location,
    })
}

fn require_positive(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::InvalidValue {
            field,
            reason: "must be greater than zero".to_string(),
        })
    } else {
        Ok(())
    }
}
