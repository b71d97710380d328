//! # landfill-core
//!
//! Classification and disposal-advice engine behind Landfill Legends.
//!
//! A request carries a photo or a text description of waste plus an optional
//! location. The [`Orchestrator`] routes it to the multimodal
//! [`Classifier`], then hands the classified items to the
//! [`DisposalAdvisor`], which lets the reasoning model call a web search
//! tool as many times as it needs (up to a configured bound) before it
//! answers with localized disposal instructions.
//!
//! ## Layers
//!
//! - [`domain`] - items, instructions, conversation turns, record schemas
//! - [`application`] - parser, classifier, search tool, advisory loop, graph
//! - [`infrastructure`] - HTTP clients for model, search and IP location
//! - [`config`] - TOML configuration with `.env` secret resolution

pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;

pub use application::advisor::{AdvisoryOutcome, AdvisoryStrategy, DisposalAdvisor};
pub use application::classifier::Classifier;
pub use application::errors::{ClassifyError, Stage, UpstreamError};
pub use application::graph::{ClassificationInput, OrchestrationState, Orchestrator, Route, route};
pub use application::parser::{ParseError, parse_records};
pub use application::policy::{CallPolicy, RetryPolicy};
pub use application::search_tool::SearchTool;
pub use config::{AppConfig, ConfigError};
pub use domain::types::{ClassificationOutcome, ClassifiedItem, DisposalInstruction, ImageInput};
pub use infrastructure::location::LocationResolver;
pub use infrastructure::model::{ModelError, ModelProvider, ModelRequest};
pub use infrastructure::search::{SearchError, SearchProvider, SearchResult};
