//! Scrub command implementation
//!
//! Prints the cleaned input on stdout. Counts, when requested, go to stderr
//! so the output can be piped.

use super::{build_scrubber, format_counts, read_input};
use crate::cli::EXIT_OK;
use crate::config::PhiGuardConfig;
use crate::scrubber::{PhiScrubber, ScrubResult};
use clap::Args;
use serde_json::Value;

/// Arguments for the scrub command
#[derive(Args, Debug)]
pub struct ScrubArgs {
    /// Text to scrub (reads stdin when omitted)
    pub text: Option<String>,

    /// Treat input as a JSON value and scrub it structurally
    #[arg(long)]
    pub json: bool,

    /// Print per-category counts to stderr
    #[arg(long)]
    pub summary: bool,
}

impl ScrubArgs {
    /// Execute the scrub command
    pub async fn execute(&self, config: &PhiGuardConfig) -> anyhow::Result<i32> {
        let scrubber = match build_scrubber(config) {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let input = read_input(self.text.as_deref()).await?;
        let (output, result) = self.scrub(&scrubber, &input);

        println!("{output}");
        if self.summary {
            eprintln!("PHI matches: {}", result.total_matches());
            if result.has_detections() {
                eprintln!("{}", format_counts(&result.counts));
            }
        }

        Ok(EXIT_OK)
    }

    /// Cleaned output text plus the counts behind it
    fn scrub(&self, scrubber: &PhiScrubber, input: &str) -> (String, ScrubResult<()>) {
        if self.json {
            if let Ok(value) = serde_json::from_str::<Value>(input) {
                match scrubber.scrub_value_detailed(&value) {
                    Ok(result) => match serde_json::to_string_pretty(&result.cleaned) {
                        Ok(text) => return (text, result.map(|_| ())),
                        Err(e) => tracing::warn!(error = %e, "Failed to serialize scrubbed JSON"),
                    },
                    Err(e) => {
                        tracing::warn!(error_kind = e.kind(), "Structured scrub failed, scrubbing as text");
                    }
                }
            } else {
                tracing::warn!("Input is not valid JSON, scrubbing as text");
            }
        }

        let result = scrubber.scrub(input.trim_end_matches('\n'));
        let text = result.cleaned.clone();
        (text, result.map(|_| ()))
    }
}
