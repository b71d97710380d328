//! Model infrastructure module
//!
//! Provides reasoning-model providers with factory pattern for easy extensibility.
//!
//! # Structure
//! - `types` - Request, ToolSpec, Error types
//! - `traits` - ModelProvider trait
//! - `adapter` - Conversation format adapters
//! - `factory` - Provider factory for creating clients
//! - `clients` - Individual client implementations

pub mod adapter;
pub mod clients;
pub mod factory;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use factory::ProviderFactory;
pub use traits::ModelProvider;
pub use types::{ModelError, ModelRequest, ToolSpec};
