use std::sync::Arc;
use tracing::{debug, info, warn};

use super::prompts;
use super::{AdvisoryOutcome, AdvisoryStrategy};
use crate::application::errors::{ClassifyError, Stage};
use crate::application::parser::{ParseError, parse_records};
use crate::application::policy::CallPolicy;
use crate::application::search_tool::SearchTool;
use crate::application::summarise;
use crate::constants::DEFAULT_MAX_ROUNDS;
use crate::domain::{ClassifiedItem, ConversationLog, DisposalInstruction, ModelTurn, ToolCall, Turn};
use crate::infrastructure::model::{ModelProvider, ModelRequest};

enum LoopState {
    BuildPrompt,
    ModelTurn,
    ToolTurn(Vec<ToolCall>),
    Done(String),
}

#[derive(Clone)]
pub struct DisposalAdvisor {
    model: Arc<dyn ModelProvider>,
    search: SearchTool,
    policy: CallPolicy,
    strategy: AdvisoryStrategy,
    max_rounds: usize,
}

impl DisposalAdvisor {
    pub fn new(model: Arc<dyn ModelProvider>, search: SearchTool, policy: CallPolicy) -> Self {
        Self {
            model,
            search,
            policy,
            strategy: AdvisoryStrategy::default(),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_strategy(mut self, strategy: AdvisoryStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Number of tool turns allowed before the loop fails
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Produces one instruction per item, appending every turn to `log`.
    ///
    /// The model sees the complete log on every call. When it still asks for
    /// tools after `max_rounds` tool turns the loop fails with
    /// [`ClassifyError::LoopExceeded`].
    pub async fn advise(
        &self,
        items: &[ClassifiedItem],
        location: Option<&str>,
        log: &mut ConversationLog,
    ) -> Result<AdvisoryOutcome, ClassifyError> {
        info!(
            strategy = %self.strategy,
            items = items.len(),
            max_rounds = self.max_rounds,
            "Disposal advice started"
        );

        let mut search_rounds = 0;
        let mut model_turns = 0;
        let mut state = LoopState::BuildPrompt;

        let answer = loop {
            state = match state {
                LoopState::BuildPrompt => {
                    let prompt = match self.strategy {
                        AdvisoryStrategy::Agentic => prompts::agentic_prompt(items, location),
                        AdvisoryStrategy::Direct => prompts::direct_prompt(items, location),
                    };
                    log.push(Turn::caller_text(prompt));
                    LoopState::ModelTurn
                }
                LoopState::ModelTurn => {
                    let turn = self.call_model(log).await?;
                    model_turns += 1;
                    log.push(Turn::Model(turn.clone()));

                    match turn {
                        ModelTurn::Answer(text) => LoopState::Done(text),
                        ModelTurn::ToolRequests(calls)
                            if self.strategy == AdvisoryStrategy::Direct =>
                        {
                            let tool = calls.first().map(|c| c.name.clone()).unwrap_or_default();
                            return Err(ClassifyError::malformed(
                                Stage::Disposal,
                                ParseError::InvalidToolCall {
                                    tool,
                                    reason: "no tools are offered in direct mode".to_string(),
                                },
                            ));
                        }
                        ModelTurn::ToolRequests(_) if search_rounds >= self.max_rounds => {
                            warn!(
                                max_rounds = self.max_rounds,
                                "Model kept requesting searches, giving up"
                            );
                            return Err(ClassifyError::LoopExceeded {
                                max_rounds: self.max_rounds,
                            });
                        }
                        ModelTurn::ToolRequests(calls) => LoopState::ToolTurn(calls),
                    }
                }
                LoopState::ToolTurn(calls) => {
                    search_rounds += 1;
                    debug!(round = search_rounds, calls = calls.len(), "Running tool turn");
                    for call in calls {
                        let output = self.search.invoke(&call).await?;
                        log.push(Turn::ToolResult { call, output });
                    }
                    LoopState::ModelTurn
                }
                LoopState::Done(text) => break text,
            };
        };

        debug!(answer = %summarise(&answer), "Model returned final answer");
        let parsed: Vec<DisposalInstruction> =
            parse_records(&answer).map_err(|e| ClassifyError::malformed(Stage::Disposal, e))?;
        let instructions = reconcile(items, parsed)?;

        info!(
            instructions = instructions.len(),
            search_rounds,
            model_turns,
            "Disposal advice completed"
        );
        Ok(AdvisoryOutcome {
            instructions,
            search_rounds,
            model_turns,
        })
    }

    async fn call_model(&self, log: &ConversationLog) -> Result<ModelTurn, ClassifyError> {
        let request = match self.strategy {
            AdvisoryStrategy::Agentic => {
                ModelRequest::new(log.snapshot()).with_tools(vec![SearchTool::spec()])
            }
            AdvisoryStrategy::Direct => ModelRequest::new(log.snapshot()).expecting_json(),
        };
        debug!(turns = request.turns.len(), "Submitting advisory turn to model provider");

        let model = self.model.clone();
        self.policy
            .run(self.model.id(), || {
                let model = model.clone();
                let request = request.clone();
                async move { model.generate(request).await }
            })
            .await
    }
}

/// Checks every instruction against the items and orders them like the items.
fn reconcile(
    items: &[ClassifiedItem],
    instructions: Vec<DisposalInstruction>,
) -> Result<Vec<DisposalInstruction>, ClassifyError> {
    let mut indexed = Vec::with_capacity(instructions.len());
    for instruction in instructions {
        let Some(position) = items.iter().position(|item| instruction.describes(item)) else {
            return Err(ClassifyError::malformed(
                Stage::Disposal,
                ParseError::UnmatchedInstruction {
                    item_name: instruction.item_name,
                    material_type: instruction.material_type,
                },
            ));
        };
        indexed.push((position, instruction));
    }
    indexed.sort_by_key(|(position, _)| *position);

    for (position, item) in items.iter().enumerate() {
        if !indexed.iter().any(|(p, _)| *p == position) {
            warn!(
                item = item.item_name.as_str(),
                material = item.material_type.as_str(),
                "No disposal instruction returned for item"
            );
        }
    }

    Ok(indexed.into_iter().map(|(_, instruction)| instruction).collect())
}
