//! Disposal Advisory Loop
//!
//! Given classified items and a location, asks the reasoning model for
//! localized disposal instructions. Under the [`AdvisoryStrategy::Agentic`]
//! strategy the model may call the `web_search` tool as often as it likes,
//! bounded by `max_rounds`, before it answers.

mod prompts;
mod runner;


use std::fmt;
use std::str::FromStr;

use crate::domain::DisposalInstruction;

pub use runner::DisposalAdvisor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdvisoryStrategy {
    /// Model may search before answering
    #[default]
    Agentic,
    /// One model call, no tools
    Direct,
}

impl FromStr for AdvisoryStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "agentic" => Ok(Self::Agentic),
            "direct" => Ok(Self::Direct),
            other => Err(format!(
                "unknown strategy '{other}' (expected 'agentic' or 'direct')"
            )),
        }
    }
}

impl fmt::Display for AdvisoryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvisoryStrategy::Agentic => f.write_str("agentic"),
            AdvisoryStrategy::Direct => f.write_str("direct"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryOutcome {
    /// Reconciled instructions, in item order
    pub instructions: Vec<DisposalInstruction>,
    /// Tool turns executed
    pub search_rounds: usize,
    pub model_turns: usize,
}
