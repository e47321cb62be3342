//! Check command implementation
//!
//! Exits with [`EXIT_PHI_FOUND`] when the input contains PHI, so it can gate
//! scripts and CI jobs.

use super::{build_scrubber, format_counts, read_input};
use crate::cli::{EXIT_OK, EXIT_PHI_FOUND};
use crate::config::PhiGuardConfig;
use crate::scrubber::PhiScrubber;
use clap::Args;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Text to check (reads stdin when omitted)
    pub text: Option<String>,
}

/// What a check found, without any of the matched text
#[derive(Debug, PartialEq, Eq)]
struct CheckOutcome {
    has_phi: bool,
    report: String,
}

impl CheckArgs {
    /// Execute the check command
    pub async fn execute(&self, config: &PhiGuardConfig) -> anyhow::Result<i32> {
        let scrubber = match build_scrubber(config) {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };

        let input = read_input(self.text.as_deref()).await?;
        let outcome = check(&scrubber, &input);
        println!("{}", outcome.report);

        Ok(if outcome.has_phi { EXIT_PHI_FOUND } else { EXIT_OK })
    }
}

fn check(scrubber: &PhiScrubber, input: &str) -> CheckOutcome {
    let has_phi = scrubber.has_phi(input);
    if !has_phi {
        return CheckOutcome {
            has_phi,
            report: "✅ No PHI detected".to_string(),
        };
    }

    let counts = scrubber.phi_summary(input);
    let mut report = String::from("⚠️  PHI detected");
    if counts.is_empty() {
        report.push_str(&format!(
            "\n  Medical context keywords: {}",
            scrubber.context_keyword_count(input)
        ));
    } else {
        report.push('\n');
        report.push_str(&format_counts(&counts));
    }

    CheckOutcome { has_phi, report }
}
