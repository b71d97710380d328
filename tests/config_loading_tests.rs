// Config loading tests - AppConfig::load from disk and validation errors

use landfill_core::config::AppConfig;
use landfill_core::{AdvisoryStrategy, ConfigError};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::tempdir;

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("landfill.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

#[test]
fn returns_error_when_file_not_found() {
    let result = AppConfig::load(Some(Path::new("/nonexistent/path/landfill.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
fn returns_error_when_model_section_missing() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[search]
type = "tavily"
"#,
    );

    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::MissingModel)));
}

#[test]
fn returns_parse_error_for_invalid_toml() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "[model\nmodel = ");

    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn loads_full_configuration() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
[model]
id = "local-llm"
type = "openai"
endpoint = "http://127.0.0.1:8000"
model = "qwen2.5-vl"
api_key = "LOCAL_LLM_KEY"
timeout_secs = 90

[search]
type = "tavily"
max_results = 3
search_depth = "advanced"

[advisor]
strategy = "direct"
max_rounds = 4

[retry]
max_attempts = 3
backoff_ms = 250

[location]
fallback = "Portland, OR 97201, US"
"#,
    );

    let config = AppConfig::load(Some(&path)).expect("config loads");

    assert!(!config.model.is_gemini());
    assert_eq!(config.model.provider_type, "openai");
    assert_eq!(config.model.id, "local-llm");
    assert_eq!(config.model.timeout(), Duration::from_secs(90));
    assert_eq!(config.search.max_results, 3);
    assert_eq!(config.search.search_depth, "advanced");
    assert_eq!(config.advisor.strategy, AdvisoryStrategy::Direct);
    assert_eq!(config.advisor.max_rounds, 4);
    assert_eq!(config.retry.policy().max_attempts, 3);
    assert_eq!(config.retry.policy().backoff, Duration::from_millis(250));
    assert_eq!(config.location.fallback, "Portland, OR 97201, US");
    assert_eq!(config.search_policy().timeout, config.search.timeout());
}

#[test]
fn defaults_fill_optional_sections() {
    let config = AppConfig::from_toml_str(
        r#"
[model]
model = "gemini-2.5-flash"
api_key = "GEMINI_API_KEY"
"#,
    )
    .expect("config parses");

    assert!(config.model.is_gemini());
    assert_eq!(config.search.max_results, 5);
    assert_eq!(config.advisor.max_rounds, 8);
    assert_eq!(config.retry.max_attempts, 1);
    assert_eq!(config.location.fallback, "Marietta, GA 30062, US");
}

#[test]
fn rejects_unknown_strategy() {
    let result = AppConfig::from_toml_str(
        r#"
[model]
model = "gemini-2.5-flash"

[advisor]
strategy = "exhaustive"
"#,
    );
    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue {
            field: "advisor.strategy",
            ..
        })
    ));
}

#[test]
fn rejects_unsupported_providers() {
    let model = AppConfig::from_toml_str(
        r#"
[model]
type = "ollama"
model = "llava"
"#,
    );
    assert!(matches!(
        model,
        Err(ConfigError::UnsupportedProvider { kind: "model", .. })
    ));

    let search = AppConfig::from_toml_str(
        r#"
[model]
model = "gemini-2.5-flash"

[search]
type = "bing"
"#,
    );
    assert!(matches!(
        search,
        Err(ConfigError::UnsupportedProvider { kind: "search", .. })
    ));
}

#[test]
fn rejects_zero_retry_attempts() {
    let result = AppConfig::from_toml_str(
        r#"
[model]
model = "gemini-2.5-flash"

[retry]
max_attempts = 0
"#,
    );
    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue {
            field: "retry.max_attempts",
            ..
        })
    ));
}
