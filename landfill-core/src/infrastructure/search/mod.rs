//! Web search infrastructure
//!
//! - `types` - SearchResult and SearchError
//! - `tavily` - Tavily search API client

pub mod tavily;
pub mod types;

pub use tavily::TavilyClient;
pub use types::{SearchError, SearchProvider, SearchResult};

use crate::config::SearchProviderConfig;
use std::sync::Arc;

/// Creates the search backend named by the configuration
pub fn create_search_provider(config: &SearchProviderConfig) -> Arc<dyn SearchProvider> {
    Arc::new(TavilyClient::from_config(config))
}
