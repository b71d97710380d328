// Shared scripted providers for the integration tests.
//
// Not every test target uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use landfill_core::domain::{ModelTurn, ToolCall};
use landfill_core::{
    CallPolicy, Classifier, DisposalAdvisor, ModelError, ModelProvider, ModelRequest,
    Orchestrator, SearchError, SearchProvider, SearchResult, SearchTool,
};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// One scripted reply, optionally delayed
pub enum Step {
    Turn(ModelTurn),
    Fail(ModelError),
    Slow(Duration, ModelTurn),
}

#[derive(Clone)]
pub struct ScriptedModel {
    steps: Arc<Mutex<VecDeque<Step>>>,
    repeat: Option<ModelTurn>,
    recordings: Arc<Mutex<Vec<ModelRequest>>>,
}

impl ScriptedModel {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into())),
            repeat: None,
            recordings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn replies(turns: Vec<ModelTurn>) -> Self {
        Self::new(turns.into_iter().map(Step::Turn).collect())
    }

    /// Plays `steps`, then answers every further call with `turn`
    pub fn then_repeat(mut self, turn: ModelTurn) -> Self {
        self.repeat = Some(turn);
        self
    }

    pub async fn requests(&self) -> Vec<ModelRequest> {
        self.recordings.lock().await.clone()
    }

    pub async fn calls(&self) -> usize {
        self.recordings.lock().await.len()
    }
}

#[async_trait]
impl ModelProvider for ScriptedModel {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: ModelRequest) -> Result<ModelTurn, ModelError> {
        self.recordings.lock().await.push(request);
        let step = self.steps.lock().await.pop_front();
        match step {
            Some(Step::Turn(turn)) => Ok(turn),
            Some(Step::Fail(err)) => Err(err),
            Some(Step::Slow(delay, turn)) => {
                tokio::time::sleep(delay).await;
                Ok(turn)
            }
            None => self
                .repeat
                .clone()
                .ok_or_else(|| ModelError::invalid_response("scripted", "script exhausted")),
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingSearch {
    queries: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingSearch {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn queries(&self) -> Vec<String> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl SearchProvider for RecordingSearch {
    fn id(&self) -> &str {
        "recording-search"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        self.queries.lock().await.push(query.to_string());
        if self.fail {
            return Err(SearchError::MissingApiKey {
                provider: "recording-search".into(),
            });
        }
        Ok((0..max_results.min(2))
            .map(|i| SearchResult {
                title: format!("Cobb County Solid Waste #{i}"),
                snippet: "Food-soiled cardboard belongs in the trash.".into(),
                url: format!("https://example.gov/waste/{i}"),
            })
            .collect())
    }
}

pub fn answer(text: &str) -> ModelTurn {
    ModelTurn::Answer(text.to_string())
}

pub fn search_request(id: &str, query: &str) -> ModelTurn {
    ModelTurn::ToolRequests(vec![ToolCall {
        id: id.to_string(),
        name: "web_search".to_string(),
        arguments: json!({ "query": query }),
        signature: None,
    }])
}

pub const PIZZA_ITEMS: &str = r#"```json
[
  {
    "item_name": "pizza box",
    "material_type": "corrugated cardboard",
    "is_hazardous": false,
    "is_soiled": true,
    "search_query": "Marietta GA greasy pizza box recycling",
    "location": null,
    "confidence_score": 0.93
  }
]
```"#;

pub const PIZZA_INSTRUCTIONS: &str = r#"[
  {
    "item_name": "pizza box",
    "material_type": "corrugated cardboard",
    "instruction": "Grease contaminates cardboard recycling, so put the soiled bottom in the trash and recycle the clean lid curbside in Cobb County."
  }
]"#;

pub fn orchestrator(
    model: &ScriptedModel,
    search: &RecordingSearch,
    policy: CallPolicy,
    max_rounds: usize,
) -> Orchestrator {
    let model: Arc<dyn ModelProvider> = Arc::new(model.clone());
    let tool = SearchTool::new(Arc::new(search.clone()), policy);
    let classifier = Classifier::new(model.clone(), policy);
    let advisor = DisposalAdvisor::new(model, tool, policy).with_max_rounds(max_rounds);
    Orchestrator::new(classifier, advisor)
}
