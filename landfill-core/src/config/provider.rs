//! # Provider Configuration
//!
//! Configuration types for the reasoning model and the search backend.
//!
//! | Section | Type | API Key Required |
//! |---------|------|-----------------|
//! | `[model]` | `gemini` | Yes |
//! | `[model]` | `openai` (any OpenAI-compatible API) | Yes |
//! | `[search]` | `tavily` | Yes |

use serde::Deserialize;
use std::time::Duration;

use crate::constants::{
    DEFAULT_MAX_SEARCH_RESULTS, DEFAULT_MODEL_TIMEOUT_SECS, DEFAULT_SEARCH_DEPTH,
    DEFAULT_SEARCH_TIMEOUT_SECS, DEFAULT_TAVILY_API_KEY_VAR, DEFAULT_TAVILY_ENDPOINT,
};

/// Configuration for the reasoning model provider.
///
/// # Example
///
/// ```toml
/// [model]
/// id = "gemini"
/// type = "gemini"
/// endpoint = "https://generativelanguage.googleapis.com"
/// api_key = "GEMINI_API_KEY"
/// model = "gemini-2.5-flash"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelProviderConfig {
    /// Identifier used in logs and error messages
    pub id: String,
    /// The provider type determines API format: "gemini" or "openai"
    pub provider_type: String,
    pub endpoint: String,
    /// Name of the environment variable holding the API key
    pub api_key: Option<String>,
    /// Custom API path override (e.g., "v1beta/models" for Gemini)
    pub api_path: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl ModelProviderConfig {
    pub fn is_gemini(&self) -> bool {
        is_gemini_type(&self.provider_type)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration for the web search backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchProviderConfig {
    pub provider_type: String,
    pub endpoint: String,
    /// Name of the environment variable holding the API key
    pub api_key: Option<String>,
    pub max_results: usize,
    pub search_depth: String,
    pub timeout_secs: u64,
}

impl SearchProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SearchProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: "tavily".to_string(),
            endpoint: DEFAULT_TAVILY_ENDPOINT.to_string(),
            api_key: Some(DEFAULT_TAVILY_API_KEY_VAR.to_string()),
            max_results: DEFAULT_MAX_SEARCH_RESULTS,
            search_depth: DEFAULT_SEARCH_DEPTH.to_string(),
            timeout_secs: DEFAULT_SEARCH_TIMEOUT_SECS,
        }
    }
}

pub(crate) fn is_gemini_type(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "gemini" | "google" | "google-ai"
    )
}

pub(crate) fn is_openai_type(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "openai" | "openai-compatible")
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct RawModelConfig {
    #[serde(default)]
    pub(super) id: Option<String>,
    #[serde(rename = "type", default)]
    pub(super) provider_type: Option<String>,
    pub(super) endpoint: Option<String>,
    pub(super) api_key: Option<String>,
    #[serde(default)]
    pub(super) api_path: Option<String>,
    pub(super) model: Option<String>,
    pub(super) timeout_secs: Option<u64>,
}

impl RawModelConfig {
    pub(super) fn provider_type(&self) -> String {
        self.provider_type
            .clone()
            .unwrap_or_else(|| "gemini".to_string())
    }

    pub(super) fn into_config(self, endpoint: String, model: String) -> ModelProviderConfig {
        let provider_type = self.provider_type();
        ModelProviderConfig {
            id: self.id.unwrap_or_else(|| provider_type.to_lowercase()),
            provider_type,
            endpoint,
            api_key: self.api_key,
            api_path: self.api_path,
            model,
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_MODEL_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawSearchConfig {
    #[serde(rename = "type", default)]
    pub(super) provider_type: Option<String>,
    pub(super) endpoint: Option<String>,
    pub(super) api_key: Option<String>,
    pub(super) max_results: Option<usize>,
    pub(super) search_depth: Option<String>,
    pub(super) timeout_secs: Option<u64>,
}

impl From<RawSearchConfig> for SearchProviderConfig {
    fn from(raw: RawSearchConfig) -> Self {
        let defaults = SearchProviderConfig::default();
        Self {
            provider_type: raw.provider_type.unwrap_or(defaults.provider_type),
            endpoint: raw.endpoint.unwrap_or(defaults.endpoint),
            api_key: raw.api_key.or(defaults.api_key),
            max_results: raw.max_results.unwrap_or(defaults.max_results),
            search_depth: raw.search_depth.unwrap_or(defaults.search_depth),
            timeout_secs: raw.timeout_secs.unwrap_or(defaults.timeout_secs),
        }
    }
}
