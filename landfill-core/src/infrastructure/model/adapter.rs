//! Message adapters - convert conversation turns between API formats

use super::types::ToolSpec;
use crate::domain::{ContentPart, ModelTurn, ToolCall, Turn};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};

/// Adapter for converting turns to different API formats
pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert turns to Gemini `contents`
    ///
    /// Caller turns become `user` content with `text`/`inline_data` parts,
    /// model turns become `model` content (`functionCall` parts for tool
    /// requests) and each run of tool results becomes one `user` content
    /// holding a `functionResponse` part per call, in call order.
    pub fn to_gemini_format(turns: &[Turn]) -> Vec<Value> {
        let mut contents: Vec<Value> = Vec::with_capacity(turns.len());
        let mut pending_responses: Vec<Value> = Vec::new();

        for turn in turns {
            if let Turn::ToolResult { call, output } = turn {
                pending_responses.push(json!({
                    "functionResponse": {
                        "name": call.name,
                        "response": output,
                    }
                }));
                continue;
            }
            // Responses to one functionCall turn must share a single content.
            if !pending_responses.is_empty() {
                contents.push(json!({
                    "role": "user",
                    "parts": std::mem::take(&mut pending_responses),
                }));
            }
            contents.push(match turn {
                Turn::Caller(parts) => json!({
                    "role": "user",
                    "parts": parts.iter().map(gemini_part).collect::<Vec<_>>(),
                }),
                Turn::Model(ModelTurn::Answer(text)) => json!({
                    "role": "model",
                    "parts": [{"text": text}],
                }),
                Turn::Model(ModelTurn::ToolRequests(calls)) => json!({
                    "role": "model",
                    "parts": calls.iter().map(gemini_function_call).collect::<Vec<_>>(),
                }),
                Turn::ToolResult { .. } => continue,
            });
        }

        if !pending_responses.is_empty() {
            contents.push(json!({"role": "user", "parts": pending_responses}));
        }
        contents
    }

    pub fn to_gemini_tools(tools: &[ToolSpec]) -> Value {
        json!([{
            "functionDeclarations": tools
                .iter()
                .map(|tool| json!({
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.parameters,
                }))
                .collect::<Vec<_>>(),
        }])
    }

    /// Convert turns to OpenAI-style chat messages
    pub fn to_openai_format(turns: &[Turn]) -> Vec<Value> {
        turns
            .iter()
            .map(|turn| match turn {
                Turn::Caller(parts) => openai_user_message(parts),
                Turn::Model(ModelTurn::Answer(text)) => json!({
                    "role": "assistant",
                    "content": text,
                }),
                Turn::Model(ModelTurn::ToolRequests(calls)) => json!({
                    "role": "assistant",
                    "content": Value::Null,
                    "tool_calls": calls.iter().map(openai_tool_call).collect::<Vec<_>>(),
                }),
                Turn::ToolResult { call, output } => json!({
                    "role": "tool",
                    "tool_call_id": call.id,
                    "content": output.to_string(),
                }),
            })
            .collect()
    }

    pub fn to_openai_tools(tools: &[ToolSpec]) -> Vec<Value> {
        tools
            .iter()
            .map(|tool| {
                json!({
                    "type": "function",
                    "function": {
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters,
                    }
                })
            })
            .collect()
    }
}

fn gemini_part(part: &ContentPart) -> Value {
    match part {
        ContentPart::Text(text) => json!({"text": text}),
        ContentPart::Image { mime_type, data } => json!({
            "inline_data": {
                "mime_type": mime_type,
                "data": STANDARD.encode(data),
            }
        }),
    }
}

fn gemini_function_call(call: &ToolCall) -> Value {
    let mut part = json!({
        "functionCall": {"name": call.name, "args": call.arguments}
    });
    if let Some(signature) = &call.signature {
        part["thoughtSignature"] = json!(signature);
    }
    part
}

fn openai_user_message(parts: &[ContentPart]) -> Value {
    let text_only = parts.iter().all(|p| matches!(p, ContentPart::Text(_)));
    if text_only {
        let text = parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text(text) => Some(text.as_str()),
                ContentPart::Image { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        return json!({"role": "user", "content": text});
    }

    let content: Vec<Value> = parts
        .iter()
        .map(|part| match part {
            ContentPart::Text(text) => json!({"type": "text", "text": text}),
            ContentPart::Image { mime_type, data } => json!({
                "type": "image_url",
                "image_url": {
                    "url": format!("data:{mime_type};base64,{}", STANDARD.encode(data)),
                }
            }),
        })
        .collect();
    json!({"role": "user", "content": content})
}

fn openai_tool_call(call: &ToolCall) -> Value {
    json!({
        "id": call.id,
        "type": "function",
        "function": {
            "name": call.name,
            "arguments": call.arguments.to_string(),
        }
    })
}
