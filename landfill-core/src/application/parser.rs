//! Structured Output Parser
//!
//! Turns the free text a reasoning model returns into validated records.
//! Models are asked for bare JSON but regularly wrap it in a fenced block,
//! so a leading fence line and the closing fence line are stripped first.

use serde_json::Value;
use thiserror::Error;

use crate::domain::StructuredRecord;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response is not valid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
    #[error("expected a JSON array of records, found {found}")]
    NotAnArray { found: &'static str },
    #[error("{schema} #{index} does not match the schema: {reason}")]
    InvalidRecord {
        schema: &'static str,
        index: usize,
        reason: String,
    },
    #[error("invalid call to tool '{tool}': {reason}")]
    InvalidToolCall { tool: String, reason: String },
    #[error("instruction for '{item_name}' ({material_type}) matches no classified item")]
    UnmatchedInstruction {
        item_name: String,
        material_type: String,
    },
}

/// Removes a surrounding fenced block, if any, and trims the result.
///
/// Only the first line (opening fence plus optional language tag) and the
/// last line (closing fence) are dropped.
pub fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let body = match trimmed.split_once('\n') {
        Some((_, rest)) => rest,
        None => return "",
    };
    let body = match body.rsplit_once('\n') {
        Some((head, last)) if last.trim_start().starts_with("```") => head,
        Some(_) => body,
        None if body.trim_start().starts_with("```") => "",
        None => body,
    };
    body.trim()
}

/// Parses `text` into a batch of `T`, rejecting the whole batch if any
/// element fails deserialization or validation.
///
/// A lone JSON object is accepted as a batch of one.
pub fn parse_records<T: StructuredRecord>(text: &str) -> Result<Vec<T>, ParseError> {
    let cleaned = strip_fences(text);
    let value: Value =
        serde_json::from_str(cleaned).map_err(|source| ParseError::InvalidJson { source })?;

    let elements = match value {
        Value::Array(elements) => elements,
        Value::Object(_) => vec![value],
        other => {
            return Err(ParseError::NotAnArray {
                found: json_kind(&other),
            });
        }
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| -> Result<T, ParseError> {
            let record: T =
                serde_json::from_value(element).map_err(|e| ParseError::InvalidRecord {
                    schema: T::NAME,
                    index,
                    reason: e.to_string(),
                })?;
            record
                .validate()
                .map_err(|reason| ParseError::InvalidRecord {
                    schema: T::NAME,
                    index,
                    reason,
                })?;
            Ok(record)
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
