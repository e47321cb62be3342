//! Summarize command implementation
//!
//! Scrubs every line of a file and prints the resulting PHI summary report.
//! Lines are split into chunks that are scrubbed on the blocking pool, all
//! sharing one scrubber.

use super::build_scrubber;
use crate::cli::{EXIT_FATAL, EXIT_OK};
use crate::config::PhiGuardConfig;
use crate::scrubber::{AuditLogger, PhiScrubber, PhiSummary};
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Report output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Console,
    Json,
}

/// Arguments for the summarize command
#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// File to scrub, one record per line
    pub file: String,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    pub format: ReportFormat,

    /// Append the report to the configured audit log
    #[arg(long)]
    pub audit: bool,

    /// Also write the JSON report to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl SummarizeArgs {
    /// Execute the summarize command
    pub async fn execute(&self, config: &PhiGuardConfig) -> anyhow::Result<i32> {
        tracing::info!(file = %self.file, "Summarizing PHI in file");

        let scrubber = match build_scrubber(config) {
            Ok(s) => Arc::new(s),
            Err(code) => return Ok(code),
        };

        let contents = match tokio::fs::read_to_string(&self.file).await {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to read {}", self.file);
                eprintln!("   Error: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        let started = Instant::now();
        let lines: Vec<String> = contents.lines().map(str::to_string).collect();
        let summary = summarize_lines(scrubber, lines).await?;
        crate::log_scrub_summary!(summary, started.elapsed());

        match self.format {
            ReportFormat::Console => println!("{}", summary.format_console()),
            ReportFormat::Json => println!("{}", summary.format_json()?),
        }

        if let Some(ref path) = self.output {
            summary.write_to_file(path)?;
            tracing::info!(path = %path.display(), "Wrote PHI summary report");
        }

        if self.audit || config.scrubber.audit.enabled {
            let audit = &config.scrubber.audit;
            let logger = AuditLogger::new(audit.log_path.clone(), audit.json_format, true)?;
            logger.log_summary(&summary, &self.file)?;
            tracing::info!(path = %logger.log_path().display(), "Appended PHI summary to audit log");
        }

        Ok(EXIT_OK)
    }
}

/// Scrub lines in parallel chunks and merge the per-chunk summaries
///
/// Blank lines are skipped and do not count as scrub calls.
pub async fn summarize_lines(
    scrubber: Arc<PhiScrubber>,
    lines: Vec<String>,
) -> anyhow::Result<PhiSummary> {
    let lines: Vec<String> = lines.into_iter().filter(|l| !l.trim().is_empty()).collect();
    let workers = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let chunk_size = lines.len().div_ceil(workers).max(1);

    let mut handles = Vec::new();
    for chunk in lines.chunks(chunk_size) {
        let chunk = chunk.to_vec();
        let scrubber = Arc::clone(&scrubber);
        handles.push(tokio::task::spawn_blocking(move || {
            let mut summary = PhiSummary::new();
            for line in &chunk {
                summary.add_result(&scrubber.scrub(line));
            }
            summary
        }));
    }

    let mut summary = PhiSummary::new();
    for handle in handles {
        summary.merge(&handle.await?);
    }
    summary.set_fingerprint(scrubber.registry().snapshot().fingerprint());

    Ok(summary)
}
