use std::fmt;
use std::time::Duration;
use thiserror::Error;

use super::parser::ParseError;
use crate::infrastructure::model::ModelError;
use crate::infrastructure::search::SearchError;

/// Pipeline stage whose model output was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Classification,
    Disposal,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Classification => f.write_str("classification"),
            Stage::Disposal => f.write_str("disposal"),
        }
    }
}

/// Failure of an external call (reasoning model or search provider)
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("{service} call timed out after {after:?}")]
    Timeout { service: String, after: Duration },
}

impl UpstreamError {
    pub fn is_transient(&self) -> bool {
        match self {
            UpstreamError::Model(err) => err.is_transient(),
            UpstreamError::Search(err) => err.is_transient(),
            UpstreamError::Timeout { .. } => true,
        }
    }
}

/// Everything `classify` can fail with.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
    #[error("{stage} output could not be parsed: {source}")]
    MalformedOutput {
        stage: Stage,
        #[source]
        source: ParseError,
    },
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(#[from] UpstreamError),
    #[error("disposal advisory loop exceeded {max_rounds} search rounds")]
    LoopExceeded { max_rounds: usize },
}

impl ClassifyError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn malformed(stage: Stage, source: ParseError) -> Self {
        Self::MalformedOutput { stage, source }
    }

    /// Stable machine-readable kind for boundary layers
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifyError::InvalidInput { .. } => "invalid_input",
            ClassifyError::MalformedOutput { .. } => "malformed_output",
            ClassifyError::UpstreamUnavailable(_) => "upstream_unavailable",
            ClassifyError::LoopExceeded { .. } => "loop_exceeded",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            ClassifyError::InvalidInput { reason } => {
                format!("The request could not be processed: {reason}.")
            }
            ClassifyError::MalformedOutput { stage, .. } => {
                format!("The AI returned {stage} data we could not understand. Please try again.")
            }
            ClassifyError::UpstreamUnavailable(UpstreamError::Model(err)) => err.user_message(),
            ClassifyError::UpstreamUnavailable(_) => {
                "An external service is unavailable right now. Please try again later.".to_string()
            }
            ClassifyError::LoopExceeded { .. } => {
                "Looking up local disposal rules took too long. Please try again.".to_string()
            }
        }
    }

    pub(crate) fn is_retryable(&self) -> bool {
        matches!(self, ClassifyError::UpstreamUnavailable(err) if err.is_transient())
    }
}

impl From<ModelError> for ClassifyError {
    fn from(err: ModelError) -> Self {
        Self::UpstreamUnavailable(err.into())
    }
}

impl From<SearchError> for ClassifyError {
    fn from(err: SearchError) -> Self {
        Self::UpstreamUnavailable(err.into())
    }
}
