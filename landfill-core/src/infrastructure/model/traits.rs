//! Model traits

use super::types::{ModelError, ModelRequest};
use crate::domain::ModelTurn;
use async_trait::async_trait;

/// A reasoning model that can read a conversation and either answer or
/// request tool invocations.
///
/// Implementations are stateless handles shared across concurrent requests.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Get the provider ID
    fn id(&self) -> &str;

    /// Produce the next model turn for the given conversation
    async fn generate(&self, request: ModelRequest) -> Result<ModelTurn, ModelError>;
}
