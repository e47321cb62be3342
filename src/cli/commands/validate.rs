//! Validate config command implementation
//!
//! This module implements the `validate-config` command. Besides the settings
//! themselves it compiles the full pattern set, so a bad custom pattern is
//! reported here rather than on first use.

use super::build_scrubber;
use crate::cli::EXIT_OK;
use crate::config::PhiGuardConfig;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// List every pattern in the resulting registry
    #[arg(long)]
    pub list_patterns: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// The configuration has already been loaded and validated by the caller.
    pub async fn execute(
        &self,
        config: &PhiGuardConfig,
        config_path: Option<&str>,
    ) -> anyhow::Result<i32> {
        let source = config_path.unwrap_or("<defaults>");
        tracing::info!(config_path = %source, "Validating configuration");

        println!("🔍 Validating configuration: {source}");
        println!();
        println!("✅ Configuration loaded successfully");

        let scrubber = match build_scrubber(config) {
            Ok(s) => s,
            Err(code) => return Ok(code),
        };
        let snapshot = scrubber.registry().snapshot();

        println!("✅ Pattern registry compiled");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Pattern Library: {}",
            config
                .scrubber
                .pattern_library
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string())
        );
        println!(
            "  Patterns: {} ({} enabled)",
            snapshot.len(),
            snapshot.enabled().count()
        );
        println!("  Custom Patterns: {}", config.scrubber.custom_patterns.len());
        println!("  Registry Fingerprint: {}", snapshot.fingerprint());
        println!("  Max Depth: {}", config.scrubber.max_depth);
        println!(
            "  Field Redaction: {} ({} key rules)",
            config.scrubber.field_redaction,
            config.scrubber.sensitive_keys.len()
        );
        println!(
            "  Context Keyword Threshold: {}",
            config.scrubber.context_keyword_threshold
        );
        println!(
            "  Audit Log: {}",
            if config.scrubber.audit.enabled {
                config.scrubber.audit.log_path.display().to_string()
            } else {
                "disabled".to_string()
            }
        );
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                format!("{} ({})", config.logging.local_path, config.logging.local_rotation)
            } else {
                "disabled".to_string()
            }
        );

        if self.list_patterns {
            println!();
            println!("{:<26} {:<24} {:>8} {:<8}", "Pattern", "Category", "Priority", "Enabled");
            println!("{}", "-".repeat(70));
            for pattern in snapshot.patterns() {
                println!(
                    "{:<26} {:<24} {:>8} {:<8}",
                    pattern.name(),
                    pattern.category().label(),
                    pattern.priority(),
                    if pattern.is_enabled() { "yes" } else { "no" }
                );
            }
        }

        println!();
        Ok(EXIT_OK)
    }
}
