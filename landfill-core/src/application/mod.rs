//! # Application layer
//!
//! - [`parser`] - Structured Output Parser
//! - [`classifier`] - Classification Client
//! - [`search_tool`] - Search Tool Adapter
//! - [`advisor`] - Disposal Advisory Loop
//! - [`graph`] - Orchestration Graph and Router

pub mod advisor;
pub mod classifier;
pub mod errors;
pub mod graph;
pub mod parser;
pub mod policy;
pub mod search_tool;

/// Shortens long payloads for log lines
pub(crate) fn summarise(text: &str) -> String {
    const MAX_CHARS: usize = 160;
    let trimmed = text.trim();
    if trimmed.chars().count() <= MAX_CHARS {
        return trimmed.to_string();
    }
    let head: String = trimmed.chars().take(MAX_CHARS).collect();
    format!("{head}…")
}
