//! Tavily search client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::types::{SearchError, SearchProvider, SearchResult};
use crate::config::SearchProviderConfig;
use crate::infrastructure::http::HttpClientBase;
use crate::infrastructure::model::factory::resolve_api_key;

#[derive(Clone)]
pub struct TavilyClient {
    base: HttpClientBase,
    search_depth: String,
}

impl TavilyClient {
    pub fn from_config(config: &SearchProviderConfig) -> Self {
        let id = config.provider_type.to_lowercase();
        let api_key = resolve_api_key(&id, config.api_key.as_deref());
        Self {
            base: HttpClientBase::new(id, config.endpoint.clone(), api_key, config.timeout()),
            search_depth: config.search_depth.clone(),
        }
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let url = self.base.build_url("/search");
        let payload = TavilyRequest {
            query,
            max_results,
            search_depth: &self.search_depth,
            include_answer: false,
            include_raw_content: false,
        };

        info!(provider = self.base.id.as_str(), query, max_results, "Sending search request");

        let response: TavilyResponse = self
            .base
            .post_with_bearer(&url, &payload)
            .await
            .map_err(|e| SearchError::from_http(&self.base.id, e))?;
        debug!(hits = response.results.len(), "Received search response");

        Ok(response.into_results(max_results))
    }
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
    include_answer: bool,
    include_raw_content: bool,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyHit>,
}

#[derive(Deserialize)]
struct TavilyHit {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

impl TavilyResponse {
    fn into_results(self, max_results: usize) -> Vec<SearchResult> {
        self.results
            .into_iter()
            .take(max_results)
            .map(|hit| SearchResult {
                title: hit.title,
                snippet: hit.content,
                url: hit.url,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn results_are_capped_and_mapped() {
        let hits: Vec<_> = (0..8)
            .map(|i| {
                json!({
                    "title": format!("Result {i}"),
                    "url": format!("https://example.org/{i}"),
                    "content": "Cobb County accepts clean cardboard curbside.",
                    "score": 0.9
                })
            })
            .collect();
        let response: TavilyResponse =
            serde_json::from_value(json!({"query": "q", "results": hits})).expect("deserializes");

        let results = response.into_results(5);

        assert_eq!(results.len(), 5);
        assert_eq!(results[0].title, "Result 0");
        assert_eq!(results[4].url, "https://example.org/4");
        assert!(results[0].snippet.contains("cardboard"));
    }
}
