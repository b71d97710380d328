//! Search Tool Adapter
//!
//! Exposes the configured [`SearchProvider`] to the reasoning model as a
//! single `web_search` tool and runs the model's invocations of it.

use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

use super::errors::{ClassifyError, Stage};
use super::parser::ParseError;
use super::policy::CallPolicy;
use crate::constants::{DEFAULT_MAX_SEARCH_RESULTS, SEARCH_TOOL_NAME};
use crate::domain::ToolCall;
use crate::infrastructure::model::ToolSpec;
use crate::infrastructure::search::{SearchProvider, SearchResult};

#[derive(Clone)]
pub struct SearchTool {
    provider: Arc<dyn SearchProvider>,
    max_results: usize,
    policy: CallPolicy,
}

impl SearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>, policy: CallPolicy) -> Self {
        Self {
            provider,
            max_results: DEFAULT_MAX_SEARCH_RESULTS,
            policy,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    /// Tool declaration advertised to the model
    pub fn spec() -> ToolSpec {
        ToolSpec {
            name: SEARCH_TOOL_NAME.to_string(),
            description: "Search the web for current, local waste disposal and recycling \
                          regulations. Returns titles, snippets and URLs."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query, ideally naming the item and the city or county"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    /// Runs one search, returning at most `max_results` hits
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ClassifyError> {
        let provider = self.provider.clone();
        let max_results = self.max_results;
        let mut results = self
            .policy
            .run(self.provider.id(), || {
                let provider = provider.clone();
                async move { provider.search(query, max_results).await }
            })
            .await?;
        results.truncate(self.max_results);
        debug!(query, hits = results.len(), "Search completed");
        Ok(results)
    }

    /// Executes a model-issued tool call and returns the payload for the
    /// tool-result turn.
    ///
    /// Calls to unknown tools or without a usable `query` argument are
    /// malformed model output.
    pub async fn invoke(&self, call: &ToolCall) -> Result<Value, ClassifyError> {
        if call.name != SEARCH_TOOL_NAME {
            return Err(ClassifyError::malformed(
                Stage::Disposal,
                ParseError::InvalidToolCall {
                    tool: call.name.clone(),
                    reason: "unknown tool".to_string(),
                },
            ));
        }

        let query = call
            .arguments
            .get("query")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| {
                ClassifyError::malformed(
                    Stage::Disposal,
                    ParseError::InvalidToolCall {
                        tool: call.name.clone(),
                        reason: "missing 'query' argument".to_string(),
                    },
                )
            })?;

        info!(tool = call.name.as_str(), query, "Model requested search");
        let results = self.search(query).await?;
        Ok(json!({
            "query": query,
            "results": results,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::search::SearchError;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Mutex;

    struct StubSearch {
        hits: usize,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchProvider for StubSearch {
        fn id(&self) -> &str {
            "stub"
        }

        async fn search(
            &self,
            query: &str,
            _max_results: usize,
        ) -> Result<Vec<SearchResult>, SearchError> {
            self.queries.lock().await.push(query.to_string());
            Ok((0..self.hits)
                .map(|i| SearchResult {
                    title: format!("hit {i}"),
                    snippet: "snippet".into(),
                    url: format!("https://example.org/{i}"),
                })
                .collect())
        }
    }

    fn tool(hits: usize) -> (SearchTool, Arc<StubSearch>) {
        let stub = Arc::new(StubSearch {
            hits,
            queries: Mutex::new(Vec::new()),
        });
        let policy = CallPolicy::new(Duration::from_secs(5), Default::default());
        (SearchTool::new(stub.clone(), policy), stub)
    }

    #[tokio::test]
    async fn results_are_capped_even_if_provider_over_delivers() {
        let (tool, _) = tool(9);
        let results = tool.search("battery recycling").await.expect("search ok");
        assert_eq!(results.len(), DEFAULT_MAX_SEARCH_RESULTS);
    }

    #[tokio::test]
    async fn invoke_passes_model_query_through() {
        let (tool, stub) = tool(2);
        let call = ToolCall {
            id: "c1".into(),
            name: SEARCH_TOOL_NAME.into(),
            arguments: json!({"query": "  Cobb County pizza box  "}),
            signature: None,
        };

        let output = tool.invoke(&call).await.expect("invoke ok");

        assert_eq!(output["query"], "Cobb County pizza box");
        assert_eq!(output["results"].as_array().map(Vec::len), Some(2));
        assert_eq!(*stub.queries.lock().await, vec!["Cobb County pizza box"]);
    }

    #[tokio::test]
    async fn unknown_tool_is_malformed_output() {
        let (tool, stub) = tool(1);
        let call = ToolCall {
            id: "c1".into(),
            name: "calculator".into(),
            arguments: json!({}),
            signature: None,
        };

        let err = tool.invoke(&call).await.unwrap_err();

        assert_eq!(err.kind(), "malformed_output");
        assert!(stub.queries.lock().await.is_empty());
    }
}
