//! Application constants
//!
//! Single source of truth for paths, endpoints and tunables.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/landfill.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Default Gemini API path (fallback when not specified in config)
pub const DEFAULT_GEMINI_API_PATH: &str = "v1beta/models";

/// Default OpenAI-compatible chat completions path
pub const DEFAULT_OPENAI_API_PATH: &str = "/v1/chat/completions";

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_TAVILY_ENDPOINT: &str = "https://api.tavily.com";
pub const DEFAULT_TAVILY_API_KEY_VAR: &str = "TAVILY_API_KEY";
pub const DEFAULT_SEARCH_DEPTH: &str = "basic";

/// Maximum number of search results handed back to the model per query
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 5;

/// Maximum number of model -> search round trips before the advisory loop gives up
pub const DEFAULT_MAX_ROUNDS: usize = 8;

pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_LOCATION_TIMEOUT_SECS: u64 = 3;

pub const DEFAULT_RETRY_ATTEMPTS: u32 = 1;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

pub const DEFAULT_LOCATION_ENDPOINT: &str = "https://ipinfo.io";

/// Location used when the caller's address is private (local development)
pub const DEV_FALLBACK_LOCATION: &str = "Marietta, GA 30062, US";

/// Name of the search tool as advertised to the reasoning model
pub const SEARCH_TOOL_NAME: &str = "web_search";
