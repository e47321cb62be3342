//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "phi-guard.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing PHI Guard configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        match fs::write(&self.output, Self::generate_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Add organization-specific identifiers under [[scrubber.custom_patterns]]");
                println!("  3. Validate configuration: phi-guard --config {} validate-config", self.output);
                println!("  4. Try it: echo 'SSN 123-45-6789' | phi-guard scrub");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate the sample configuration
    fn generate_config() -> &'static str {
        r#"# PHI Guard Configuration File
#
# Every setting has a default; remove anything you do not need to change.
# ${VAR} placeholders are replaced from the environment before parsing, and
# PHI_GUARD_<SECTION>_<KEY> variables override individual values.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Scrubber Settings
# ============================================================================
[scrubber]
# Maximum container nesting for structured values (arrays/objects,
# including JSON embedded in strings)
max_depth = 64

# Optional replacement for the built-in pattern library
# pattern_library = "/etc/phi-guard/patterns.toml"

# Redact whole values under PHI-named fields (ssn, dob, patient_name, ...)
field_redaction = true

# Distinct medical context words that make `check` report PHI on their own
context_keyword_threshold = 3

# Built-in patterns to switch off by name
disabled_patterns = []

# Custom patterns. Lower priority runs first and claims its span.
# [[scrubber.custom_patterns]]
# name = "employee_id"
# category = "EMPLOYEE_ID"
# pattern = 'EMP\d{6}'
# priority = 5

# Extra sensitive field names. Setting this list replaces the defaults.
# [[scrubber.sensitive_keys]]
# key = "guardian_name"
# category = "PATIENT_NAME"

# ============================================================================
# Audit Log (category counts only, never matched text)
# ============================================================================
[scrubber.audit]
enabled = false
log_path = "./audit/phi_summary.log"
json_format = true

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Directory for log files
local_path = "./logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"

# Emit console logs (stderr) as JSON
json_console = false
"#
    }
}
