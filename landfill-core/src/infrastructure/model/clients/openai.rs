//! OpenAI-compatible client implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ModelProviderConfig;
use crate::constants::DEFAULT_OPENAI_API_PATH;
use crate::domain::{ModelTurn, ToolCall};
use crate::infrastructure::http::HttpClientBase;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{ModelError, ModelRequest};

/// OpenAI-compatible client (works with OpenAI, Mistral, Groq, vLLM, etc.)
#[derive(Clone)]
pub struct OpenAIClient {
    base: HttpClientBase,
    api_path: String,
    model: String,
}

impl OpenAIClient {
    pub fn from_config(config: &ModelProviderConfig) -> Self {
        let api_key = resolve_api_key(&config.id, config.api_key.as_deref());
        Self {
            base: HttpClientBase::new(
                config.id.clone(),
                config.endpoint.clone(),
                api_key,
                config.timeout(),
            ),
            api_path: config
                .api_path
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_API_PATH.to_string()),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl ModelProvider for OpenAIClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn generate(&self, request: ModelRequest) -> Result<ModelTurn, ModelError> {
        let url = self.base.build_url(&self.api_path);

        let payload = OpenAIRequest {
            model: self.model.clone(),
            messages: MessageAdapter::to_openai_format(&request.turns),
            tools: (!request.tools.is_empty())
                .then(|| MessageAdapter::to_openai_tools(&request.tools)),
            stream: false,
        };

        info!(
            provider = self.base.id.as_str(),
            model = self.model.as_str(),
            turns = request.turns.len(),
            tools = request.tools.len(),
            "Sending request to OpenAI-compatible provider"
        );

        let response: OpenAIResponse = self
            .base
            .post_with_bearer(&url, &payload)
            .await
            .map_err(|e| ModelError::from_http(&self.base.id, e))?;
        debug!("Received response from OpenAI-compatible provider");

        response.into_turn(&self.base.id)
    }
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    stream: bool,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: Option<OpenAIMessage>,
}

#[derive(Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAIToolCall>>,
}

#[derive(Deserialize)]
struct OpenAIToolCall {
    id: String,
    function: OpenAIFunction,
}

#[derive(Deserialize)]
struct OpenAIFunction {
    name: String,
    arguments: String,
}

impl OpenAIResponse {
    fn into_turn(self, provider: &str) -> Result<ModelTurn, ModelError> {
        let message = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .ok_or_else(|| ModelError::invalid_response(provider, "missing message"))?;

        let tool_calls = message.tool_calls.unwrap_or_default();
        if !tool_calls.is_empty() {
            let calls = tool_calls
                .into_iter()
                .map(|call| -> Result<ToolCall, ModelError> {
                    let arguments: Value = serde_json::from_str(&call.function.arguments).map_err(|e| {
                        ModelError::invalid_response(
                            provider,
                            format!("tool call arguments are not JSON: {e}"),
                        )
                    })?;
                    Ok(ToolCall {
                        id: call.id,
                        name: call.function.name,
                        arguments,
                        signature: None,
                    })
                })
                .collect::<Result<Vec<_>, ModelError>>()?;
            return Ok(ModelTurn::ToolRequests(calls));
        }

        message
            .content
            .filter(|text| !text.trim().is_empty())
            .map(ModelTurn::Answer)
            .ok_or_else(|| ModelError::invalid_response(provider, "missing content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> Result<ModelTurn, ModelError> {
        serde_json::from_value::<OpenAIResponse>(body)
            .expect("response deserializes")
            .into_turn("openai")
    }

    #[test]
    fn tool_calls_are_decoded_from_argument_strings() {
        let turn = parse(json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "web_search", "arguments": "{\"query\":\"battery drop-off\"}"}
                    }]
                }
            }]
        }))
        .expect("turn parses");

        let calls = turn.tool_calls();
        assert_eq!(calls[0].id, "call_abc");
        assert_eq!(calls[0].arguments["query"], "battery drop-off");
    }

    #[test]
    fn plain_content_is_an_answer() {
        let turn = parse(json!({
            "choices": [{"message": {"content": "[]"}}]
        }))
        .expect("turn parses");
        assert_eq!(turn, ModelTurn::Answer("[]".into()));
    }

    #[test]
    fn garbled_arguments_are_invalid() {
        let err = parse(json!({
            "choices": [{
                "message": {
                    "tool_calls": [{
                        "id": "call_abc",
                        "function": {"name": "web_search", "arguments": "{query"}
                    }]
                }
            }]
        }))
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidResponse { .. }));
    }
}
