//! Conversation turns exchanged with the reasoning model.

use serde_json::Value;

/// One piece of caller content.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    Image { mime_type: String, data: Vec<u8> },
}

/// A model-issued request to run a named tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    /// Provider-assigned id, or a generated one when the provider has none.
    pub id: String,
    pub name: String,
    pub arguments: Value,
    /// Opaque provider signature that must be echoed back with the call.
    pub signature: Option<String>,
}

/// What the model produced on one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelTurn {
    /// Final free-text answer.
    Answer(String),
    /// One or more tool invocations; never empty.
    ToolRequests(Vec<ToolCall>),
}

impl ModelTurn {
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            ModelTurn::Answer(_) => &[],
            ModelTurn::ToolRequests(calls) => calls,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    Caller(Vec<ContentPart>),
    Model(ModelTurn),
    /// Output of one tool invocation, tagged with the call that produced it.
    ToolResult { call: ToolCall, output: Value },
}

impl Turn {
    pub fn caller_text(text: impl Into<String>) -> Self {
        Turn::Caller(vec![ContentPart::Text(text.into())])
    }
}

/// Append-only, strictly ordered turn log for one request.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Owned copy of every turn so far, handed to the next model call.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }
}
