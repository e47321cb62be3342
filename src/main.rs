// PHI Guard - PHI scrubbing for logs and structured data
// Copyright (c) 2025 PHI Guard Contributors
// Licensed under the MIT License

use phi_guard::cli::{Cli, Commands, EXIT_CONFIG_ERROR, EXIT_FATAL};
use phi_guard::config::{load_config_or_default, LoggingConfig, PhiGuardConfig};
use phi_guard::logging::init_logging;
use clap::Parser;
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    // This is optional - if .env doesn't exist, it's silently ignored
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load_config_or_default(cli.config.as_deref().map(Path::new)) {
        Ok(config) => config,
        // init writes a fresh file, so a broken existing one must not block it
        Err(_) if matches!(cli.command, Commands::Init(_)) => PhiGuardConfig::default(),
        Err(e) => {
            eprintln!("❌ Failed to load configuration");
            eprintln!("   Error: {e}");
            process::exit(EXIT_CONFIG_ERROR);
        }
    };

    let log_level = cli
        .log_level
        .as_deref()
        .unwrap_or(config.application.log_level.as_str());
    let logging_config = match cli.command {
        Commands::Init(_) => LoggingConfig::default(),
        _ => config.logging.clone(),
    };
    let guard = match init_logging(log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(EXIT_FATAL);
        }
    };

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        "PHI Guard - PHI scrubbing for logs and structured data"
    );

    let exit_code = match execute_command(&cli, &config).await {
        Ok(code) => code,
        Err(e) => {
            phi_guard::log_error_with_context!(e, "Command execution failed");
            eprintln!("Error: {e}");
            EXIT_FATAL
        }
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli, config: &PhiGuardConfig) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Scrub(args) => args.execute(config).await,
        Commands::Check(args) => args.execute(config).await,
        Commands::Summarize(args) => args.execute(config).await,
        Commands::ValidateConfig(args) => args.execute(config, cli.config.as_deref()).await,
        Commands::Init(args) => args.execute().await,
    }
}
