//! Sales QA server
//!
//! Main entry point for the `salesqa` binary: serves a static sales dataset
//! and answers questions scoped to it.

use clap::Parser;
use salesqa_core::{config::AppConfig, logging, AppResult};
use salesqa_server::{run_serve, AppState};
use std::path::PathBuf;
use std::sync::Arc;

/// Sales QA - dataset API with scoped LLM answers
#[derive(Parser, Debug)]
#[command(name = "salesqa")]
#[command(about = "Serve a sales dataset and answer questions scoped to it", long_about = None)]
#[command(version)]
struct Cli {
    /// Address to listen on (default: 0.0.0.0:8000)
    #[arg(short, long, env = "SALESQA_BIND")]
    bind: Option<String>,

    /// Path to the JSON dataset (default: dummyData.json)
    #[arg(short, long, env = "SALESQA_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Completion provider (gemini, ollama)
    #[arg(short, long, env = "SALESQA_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, env = "SALESQA_MODEL")]
    model: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // A missing .env file is fine
    let _ = dotenv::dotenv();

    let cli = Cli::parse();

    let config = AppConfig::load()?.with_overrides(
        cli.bind,
        cli.data_file,
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Sales QA server starting");
    tracing::debug!("Dataset: {:?}", config.data_file);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    config.validate()?;

    let state = AppState::from_config(&config)?;
    let result: AppResult<()> = run_serve(&config.bind, Arc::new(state))
        .await
        .map_err(Into::into);

    match &result {
        Ok(()) => tracing::info!("Server exited cleanly"),
        Err(e) => tracing::error!("Server failed: {}", e),
    }

    result
}
