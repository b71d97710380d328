mod cli;

use clap::Parser;
use cli::Cli;
use landfill_core::{AppConfig, LocationResolver, Orchestrator};
use serde_json::json;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();
    debug!(?cli.strategy, config = ?cli.config, ip = ?cli.ip, "CLI arguments parsed");

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(strategy) = cli.strategy {
        config.advisor.strategy = strategy.into();
    }
    if let Some(max_rounds) = cli.max_rounds {
        config.advisor.max_rounds = max_rounds as usize;
    }
    info!(
        provider = config.model.id.as_str(),
        model = config.model.model.as_str(),
        strategy = %config.advisor.strategy,
        max_rounds = config.advisor.max_rounds,
        "Configuration loaded"
    );

    let mut input = cli.input()?;
    input.location = match (&cli.location, cli.ip) {
        (Some(location), _) => Some(location.clone()),
        (None, Some(ip)) => LocationResolver::from_config(&config.location).resolve(ip).await,
        (None, None) => None,
    };

    let orchestrator = Orchestrator::from_config(&config);
    let result = tokio::select! {
        result = orchestrator.classify(input) => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, request cancelled");
            return Ok(ExitCode::from(130));
        }
    };

    match result {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            warn!(kind = err.kind(), error = %err, "Classification failed");
            let output = json!({
                "error": err.kind(),
                "message": err.user_message(),
            });
            eprintln!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .init();
    });
}
