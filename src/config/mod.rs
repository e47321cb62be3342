//! Configuration management for PHI Guard.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! PHI Guard uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `PHI_GUARD_*` environment overrides
//! - Default values for every setting, so no file is required
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use phi_guard::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("phi-guard.toml")?;
//!
//! println!("Max depth: {}", config.scrubber.max_depth);
//! println!("Audit enabled: {}", config.scrubber.audit.enabled);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`ScrubberConfig`](crate::scrubber::ScrubberConfig) - Pattern library,
//!   custom patterns, sensitive keys, depth bound and audit settings
//! - [`LoggingConfig`] - Console and file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [scrubber]
//! max_depth = 64
//! field_redaction = true
//! context_keyword_threshold = 3
//! disabled_patterns = ["ssn_bare"]
//!
//! [[scrubber.custom_patterns]]
//! name = "employee_id"
//! category = "EMPLOYEE_ID"
//! pattern = 'EMP\d{6}'
//! priority = 5
//!
//! [scrubber.audit]
//! enabled = true
//! log_path = "${PHI_GUARD_AUDIT_DIR}/phi_summary.log"
//!
//! [logging]
//! local_enabled = true
//! local_path = "./logs"
//! local_rotation = "daily"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str, load_config_or_default};
pub use schema::{ApplicationConfig, LoggingConfig, PhiGuardConfig};
