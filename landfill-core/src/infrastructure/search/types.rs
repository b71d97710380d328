use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::http::HttpError;

/// One search hit, summarised for the reasoning model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search provider '{provider}' requires an API key")]
    MissingApiKey { provider: String },
    #[error("network error calling search provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
}

impl SearchError {
    pub fn from_http(provider: impl Into<String>, err: HttpError) -> Self {
        let provider = provider.into();
        match err {
            HttpError::MissingApiKey => Self::MissingApiKey { provider },
            HttpError::Transport(source) => Self::Network { provider, source },
        }
    }

    /// Whether retrying the same call could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            SearchError::MissingApiKey { .. } => false,
            SearchError::Network { source, .. } => match source.status() {
                Some(status) => {
                    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
                }
                None => true,
            },
        }
    }
}

/// A web search backend.
///
/// Implementations return at most `max_results` hits and perform no caching,
/// ranking or deduplication of their own.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn id(&self) -> &str;

    async fn search(&self, query: &str, max_results: usize)
    -> Result<Vec<SearchResult>, SearchError>;
}
