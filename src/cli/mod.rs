//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for PHI Guard using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Success
pub const EXIT_OK: i32 = 0;
/// `check` found PHI
pub const EXIT_PHI_FOUND: i32 = 1;
/// Configuration could not be loaded or is invalid
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Unrecoverable error
pub const EXIT_FATAL: i32 = 5;

/// PHI Guard - PHI scrubbing for logs and structured data
#[derive(Parser, Debug)]
#[command(name = "phi-guard")]
#[command(version, about, long_about = None)]
#[command(author = "PHI Guard Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long, env = "PHI_GUARD_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PHI_GUARD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrub text or a JSON value and print the cleaned result
    Scrub(commands::scrub::ScrubArgs),

    /// Report whether input contains PHI (exit code 1 when it does)
    Check(commands::check::CheckArgs),

    /// Scrub a file line by line and print a PHI summary report
    Summarize(commands::summarize::SummarizeArgs),

    /// Validate configuration file and pattern library
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
