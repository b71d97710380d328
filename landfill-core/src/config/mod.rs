pub mod app;
pub mod error;
pub mod loader;
pub mod provider;

pub use crate::constants::CONFIG_PATH;
pub use app::{AdvisorConfig, AppConfig, LocationConfig, RetryConfig};
pub use error::ConfigError;
pub use provider::{ModelProviderConfig, SearchProviderConfig};
