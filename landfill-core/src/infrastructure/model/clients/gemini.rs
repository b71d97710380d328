//! Gemini client implementation

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ModelProviderConfig;
use crate::constants::DEFAULT_GEMINI_API_PATH;
use crate::domain::{ModelTurn, ToolCall};
use crate::infrastructure::http::HttpClientBase;
use crate::infrastructure::model::adapter::MessageAdapter;
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{ModelError, ModelRequest};

/// Gemini client for Google AI
#[derive(Clone)]
pub struct GeminiClient {
    base: HttpClientBase,
    api_path: String,
    model: String,
}

impl GeminiClient {
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
                .unwrap_or_else(|| DEFAULT_GEMINI_API_PATH.to_string()),
            model: config.model.clone(),
        }
    }

    fn build_model_url(&self) -> String {
        let base = self.base.endpoint.trim_end_matches('/');
        let path = self.api_path.trim_matches('/');
        format!("{base}/{path}/{}:generateContent", self.model)
    }

    fn build_payload(request: &ModelRequest) -> Value {
        let mut payload = json!({
            "contents": MessageAdapter::to_gemini_format(&request.turns),
        });

        if !request.tools.is_empty() {
            payload["tools"] = MessageAdapter::to_gemini_tools(&request.tools);
        } else if request.json_response {
            // JSON mode cannot be combined with function calling.
            payload["generationConfig"] = json!({"responseMimeType": "application/json"});
        }

        payload
    }
}

#[async_trait]
impl ModelProvider for GeminiClient {
    fn id(&self) -> &str {
        &self.base.id
    }

    async fn generate(&self, request: ModelRequest) -> Result<ModelTurn, ModelError> {
        let url = self.build_model_url();
        let payload = Self::build_payload(&request);

        info!(
            provider = self.base.id.as_str(),
            model = self.model.as_str(),
            turns = request.turns.len(),
            tools = request.tools.len(),
            "Sending request to Gemini"
        );

        let response: GeminiResponse = self
            .base
            .post_with_query_key(&url, &payload)
            .await
            .map_err(|e| ModelError::from_http(&self.base.id, e))?;
        debug!("Received response from Gemini");

        response.into_turn(&self.base.id)
    }
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    function_call: Option<GeminiFunctionCall>,
    thought_signature: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize)]
struct GeminiFunctionCall {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    args: Value,
}

impl GeminiResponse {
    fn into_turn(self, provider: &str) -> Result<ModelTurn, ModelError> {
        let parts = self
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .ok_or_else(|| ModelError::invalid_response(provider, "missing candidate content"))?;

        let mut calls = Vec::new();
        let mut text = String::new();
        for part in parts {
            if let Some(call) = part.function_call {
                calls.push(ToolCall {
                    id: call
                        .id
                        .unwrap_or_else(|| format!("call-{}", Uuid::new_v4().simple())),
                    name: call.name,
                    arguments: call.args,
                    signature: part.thought_signature,
                });
            } else if let Some(fragment) = part.text.filter(|_| !part.thought) {
                text.push_str(&fragment);
            }
        }

        if !calls.is_empty() {
            return Ok(ModelTurn::ToolRequests(calls));
        }
        if text.trim().is_empty() {
            return Err(ModelError::invalid_response(provider, "missing text"));
        }
        Ok(ModelTurn::Answer(text))
    }
}
