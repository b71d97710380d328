//! Model types - Request, ToolSpec, and Error types

use crate::domain::Turn;
use crate::infrastructure::http::HttpError;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// A tool the model may call, described by a JSON schema for its arguments
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Model request carrying the full conversation so far
#[derive(Debug, Clone, Default)]
pub struct ModelRequest {
    pub turns: Vec<Turn>,
    pub tools: Vec<ToolSpec>,
    /// Ask the provider for a JSON-only answer where it supports that
    pub json_response: bool,
}

impl ModelRequest {
    pub fn new(turns: Vec<Turn>) -> Self {
        Self {
            turns,
            tools: Vec::new(),
            json_response: false,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = tools;
        self
    }

    pub fn expecting_json(mut self) -> Self {
        self.json_response = true;
        self
    }
}

/// Model errors
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("provider '{provider}' requires an API key")]
    MissingApiKey { provider: String },
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

impl ModelError {
    pub fn missing_api_key(provider: impl Into<String>) -> Self {
        Self::MissingApiKey {
            provider: provider.into(),
        }
    }

    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn from_http(provider: impl Into<String>, err: HttpError) -> Self {
        match err {
            HttpError::MissingApiKey => Self::missing_api_key(provider),
            HttpError::Transport(source) => Self::network(provider, source),
        }
    }

    /// Whether retrying the same call could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ModelError::MissingApiKey { .. } => false,
            ModelError::Network { source, .. } => match source.status() {
                Some(status) => status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS,
                None => true,
            },
            ModelError::InvalidResponse { .. } => true,
        }
    }

    /// User-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ModelError::MissingApiKey { provider } => {
                format!("Model provider '{provider}' requires an API key.")
            }
            ModelError::Network { provider, source } => {
                if source.is_connect() {
                    format!("Could not connect to model provider '{provider}'.")
                } else if source.is_timeout() {
                    format!("Request to '{provider}' timed out.")
                } else if let Some(status) = source.status() {
                    match status {
                        StatusCode::NOT_FOUND => format!("Endpoint for '{provider}' was not found."),
                        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
                            format!("Provider '{provider}' is currently unavailable.")
                        }
                        _ => format!("Request to '{provider}' failed: {}", status.as_u16()),
                    }
                } else {
                    format!("Network error while calling '{provider}'.")
                }
            }
            ModelError::InvalidResponse { provider, .. } => {
                format!("Response from '{provider}' was not valid.")
            }
        }
    }
}
